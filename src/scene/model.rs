use crate::compositor::camera::CameraState;
use crate::compositor::panel::{Panel, PanelOptions};
use crate::compositor::passive::PassiveMotionState;
use crate::entity::artwork::{Artwork, ArtworkOptions, ArtworkState};
use crate::entity::audio::{Instrument, InstrumentOptions, InstrumentState};
use crate::entity::caption::{Caption, CaptionState};
use crate::foundation::error::{PanoplyError, PanoplyResult};
use crate::layout::frame::FrameState;
use crate::layout::viewport::Viewport;
use crate::sequencer::resolve::{Sequencer, SequencerMode};
use crate::sequencer::script::{StateLibrary, StateScript};
use crate::timeline::clock::{DEFAULT_GESTURE_RATE, SceneEntry};
use crate::timeline::trigger::TriggerTable;

fn default_step_count() -> usize {
    30
}

fn default_home_spacing() -> f64 {
    50.0
}

fn default_gesture_rate() -> f64 {
    DEFAULT_GESTURE_RATE
}

/// JSON-facing scene description.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct SceneDef {
    #[serde(default = "default_step_count")]
    pub(crate) step_count: usize,
    #[serde(default)]
    pub(crate) entry: SceneEntry,
    #[serde(default = "default_home_spacing")]
    pub(crate) home_position_x_spacing: f64,
    #[serde(default = "default_gesture_rate")]
    pub(crate) gesture_rate: f64,
    #[serde(default)]
    pub(crate) mode: SequencerMode,
    #[serde(default)]
    pub(crate) viewport: Option<Viewport>,
    #[serde(default)]
    pub(crate) panels: Vec<PanelDef>,
    #[serde(default)]
    pub(crate) artworks: Vec<ArtworkDef>,
    #[serde(default)]
    pub(crate) captions: Vec<CaptionDef>,
    #[serde(default)]
    pub(crate) instruments: Vec<InstrumentDef>,
    #[serde(default)]
    pub(crate) triggers: TriggerTable,
}

/// A state library plus the script that sequences it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct TrackDef<S> {
    #[serde(default)]
    pub(crate) states: StateLibrary<S>,
    #[serde(default)]
    pub(crate) script: Vec<String>,
}

impl<S> Default for TrackDef<S> {
    fn default() -> Self {
        Self {
            states: StateLibrary::new(),
            script: Vec::new(),
        }
    }
}

impl<S> TrackDef<S> {
    fn build(self, start_index: usize, mode: SequencerMode, owner: &str) -> PanoplyResult<Sequencer<S>> {
        let script = StateScript::from_labels(&self.states, &self.script)
            .map_err(|e| PanoplyError::validation(format!("{owner}: {e}")))?;
        Ok(Sequencer::new(self.states, script, start_index).with_mode(mode))
    }
}

/// Passive motion keeps two libraries driven by one script.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct PassiveDef {
    #[serde(default)]
    pub(crate) horizontal: StateLibrary<PassiveMotionState>,
    #[serde(default)]
    pub(crate) vertical: StateLibrary<PassiveMotionState>,
    #[serde(default)]
    pub(crate) script: Vec<String>,
}

impl PassiveDef {
    fn build(
        self,
        start_index: usize,
        mode: SequencerMode,
        owner: &str,
    ) -> PanoplyResult<(Sequencer<PassiveMotionState>, Sequencer<PassiveMotionState>)> {
        let h = passive_axis(self.horizontal, &self.script, start_index, mode, owner, "horizontal")?;
        let v = passive_axis(self.vertical, &self.script, start_index, mode, owner, "vertical")?;
        Ok((h, v))
    }
}

fn passive_axis(
    states: StateLibrary<PassiveMotionState>,
    labels: &[String],
    start_index: usize,
    mode: SequencerMode,
    owner: &str,
    axis: &str,
) -> PanoplyResult<Sequencer<PassiveMotionState>> {
    // An empty library leaves that axis idle instead of rejecting the shared script.
    let script = if states.is_empty() {
        StateScript::default()
    } else {
        StateScript::from_labels(&states, labels)
            .map_err(|e| PanoplyError::validation(format!("{owner} passive {axis}: {e}")))?
    };
    Ok(Sequencer::new(states, script, start_index).with_mode(mode))
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct PanelDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) start_index: usize,
    #[serde(default)]
    pub(crate) options: PanelOptions,
    #[serde(default)]
    pub(crate) frames: TrackDef<FrameState>,
    #[serde(default)]
    pub(crate) cameras: TrackDef<CameraState>,
    #[serde(default)]
    pub(crate) passive: PassiveDef,
}

impl PanelDef {
    pub(crate) fn build(self, mode: SequencerMode) -> PanoplyResult<Panel> {
        let owner = format!("panel '{}' frames", self.name);
        let frames = self.frames.build(self.start_index, mode, &owner)?;
        let owner = format!("panel '{}' cameras", self.name);
        let cameras = self.cameras.build(self.start_index, mode, &owner)?;
        let owner = format!("panel '{}'", self.name);
        let (passive_h, passive_v) = self.passive.build(self.start_index, mode, &owner)?;
        Ok(Panel::new(self.name, frames, cameras, passive_h, passive_v, self.options))
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct ArtworkDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) start_index: usize,
    #[serde(default)]
    pub(crate) options: ArtworkOptions,
    #[serde(flatten)]
    pub(crate) track: TrackDef<ArtworkState>,
}

impl ArtworkDef {
    pub(crate) fn build(self, mode: SequencerMode) -> PanoplyResult<Artwork> {
        let owner = format!("artwork '{}'", self.name);
        let states = self.track.build(self.start_index, mode, &owner)?;
        Ok(Artwork::new(self.name, states, self.options))
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct CaptionDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) panel: Option<String>,
    #[serde(default)]
    pub(crate) start_index: usize,
    #[serde(flatten)]
    pub(crate) track: TrackDef<CaptionState>,
}

impl CaptionDef {
    pub(crate) fn build(self, mode: SequencerMode) -> PanoplyResult<Caption> {
        let owner = format!("caption '{}'", self.name);
        let states = self.track.build(self.start_index, mode, &owner)?;
        Ok(Caption::new(self.name, states, self.panel))
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct InstrumentDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) start_index: usize,
    #[serde(default)]
    pub(crate) options: InstrumentOptions,
    #[serde(flatten)]
    pub(crate) track: TrackDef<InstrumentState>,
}

impl InstrumentDef {
    pub(crate) fn build(self, mode: SequencerMode) -> PanoplyResult<Instrument> {
        let owner = format!("instrument '{}'", self.name);
        let states = self.track.build(self.start_index, mode, &owner)?;
        Ok(Instrument::new(self.name, states, self.options))
    }
}
