use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::compositor::panel::{Panel, PanelOutput};
use crate::entity::artwork::{Artwork, ArtworkOutput, PanelLink};
use crate::entity::audio::{AudioSink, Instrument};
use crate::entity::caption::{Caption, CaptionOutput};
use crate::foundation::core::Vec3;
use crate::foundation::error::{PanoplyError, PanoplyResult};
use crate::layout::viewport::Viewport;
use crate::scene::model::SceneDef;
use crate::sequencer::resolve::SequencerMode;
use crate::timeline::clock::{StepChange, TimelineClock};
use crate::timeline::tick::{InputAxes, TickContext};
use crate::timeline::trigger::{AnimationTrigger, TriggerTable};

/// A request to move the target step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// One step forward.
    Next,
    /// One step back.
    Previous,
    /// Step 0.
    First,
    /// The last step.
    Last,
    /// A specific step, clamped into range.
    To(i64),
}

/// Everything a scene produces in one tick, indexed like the scene's entity lists.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneFrame {
    /// Target step during the tick.
    pub target_step: usize,
    /// Interpolated step during the tick.
    pub interpolated_step: f64,
    /// One output per panel.
    pub panels: Vec<PanelOutput>,
    /// One entry per artwork; `None` when it did not update.
    pub artworks: Vec<Option<ArtworkOutput>>,
    /// One entry per caption; `None` when it was not placed.
    pub captions: Vec<Option<CaptionOutput>>,
}

/// A loaded comic scene: the timeline clock plus every animated entity.
///
/// Panels update before the artwork and captions that read their output.
#[derive(Debug)]
pub struct Scene {
    clock: TimelineClock,
    gesture_rate: f64,
    mode: SequencerMode,
    viewport: Option<Viewport>,
    panels: Vec<Panel>,
    artworks: Vec<Artwork>,
    artwork_panels: Vec<Option<usize>>,
    captions: Vec<Caption>,
    caption_panels: Vec<Option<usize>>,
    instruments: Vec<Instrument>,
    triggers: TriggerTable,
}

impl Scene {
    /// Parse and build a scene from a JSON reader.
    ///
    /// Script labels and panel references are resolved here; call [`Scene::validate`]
    /// for the remaining consistency checks.
    pub fn from_reader<R: std::io::Read>(r: R) -> PanoplyResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| PanoplyError::serde(format!("parse scene JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse and build a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PanoplyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| PanoplyError::validation(format!("open scene JSON '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    pub(crate) fn from_def(def: SceneDef) -> PanoplyResult<Self> {
        let clock = TimelineClock::starting_at(def.step_count, def.entry)?;
        let mode = def.mode;

        let mut panels = def
            .panels
            .into_iter()
            .map(|p| p.build(mode))
            .collect::<PanoplyResult<Vec<_>>>()?;
        assign_home_positions(&mut panels, def.home_position_x_spacing);

        let index: BTreeMap<&str, usize> = panels
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name(), i))
            .collect();
        let lookup = |owner: &str, panel: Option<&str>| -> PanoplyResult<Option<usize>> {
            panel
                .map(|name| {
                    index.get(name).copied().ok_or_else(|| {
                        PanoplyError::validation(format!("{owner} references missing panel '{name}'"))
                    })
                })
                .transpose()
        };

        let artworks = def
            .artworks
            .into_iter()
            .map(|a| a.build(mode))
            .collect::<PanoplyResult<Vec<_>>>()?;
        let artwork_panels = artworks
            .iter()
            .map(|a| lookup(&format!("artwork '{}'", a.name()), a.options().panel.as_deref()))
            .collect::<PanoplyResult<Vec<_>>>()?;

        let captions = def
            .captions
            .into_iter()
            .map(|c| c.build(mode))
            .collect::<PanoplyResult<Vec<_>>>()?;
        let caption_panels = captions
            .iter()
            .map(|c| lookup(&format!("caption '{}'", c.name()), c.panel()))
            .collect::<PanoplyResult<Vec<_>>>()?;

        let instruments = def
            .instruments
            .into_iter()
            .map(|i| i.build(mode))
            .collect::<PanoplyResult<Vec<_>>>()?;

        Ok(Self {
            clock,
            gesture_rate: def.gesture_rate,
            mode,
            viewport: def.viewport,
            panels,
            artworks,
            artwork_panels,
            captions,
            caption_panels,
            instruments,
            triggers: def.triggers,
        })
    }

    /// Consistency checks beyond what building the scene already enforces.
    pub fn validate(&self) -> PanoplyResult<()> {
        if !(self.gesture_rate.is_finite() && self.gesture_rate > 0.0) {
            return Err(PanoplyError::validation("gesture_rate must be > 0"));
        }
        if let Some(vp) = &self.viewport {
            vp.validate()?;
        }
        unique_names("panel", self.panels.iter().map(Panel::name))?;
        unique_names("artwork", self.artworks.iter().map(Artwork::name))?;
        unique_names("caption", self.captions.iter().map(Caption::name))?;
        unique_names("instrument", self.instruments.iter().map(Instrument::name))?;

        let steps = self.clock.step_count();
        for panel in &self.panels {
            if panel.frames().script().len() > steps || panel.cameras().script().len() > steps {
                tracing::warn!(panel = panel.name(), steps, "panel script is longer than the timeline");
            }
        }
        for instrument in &self.instruments {
            let fade = instrument.options().fade_time;
            if fade.is_nan() || fade < 0.0 {
                return Err(PanoplyError::validation(format!(
                    "instrument '{}' fade_time must be >= 0",
                    instrument.name()
                )));
            }
        }
        for trigger in self.triggers.triggers() {
            if trigger.timeline_step >= steps {
                return Err(PanoplyError::validation(format!(
                    "trigger '{}' on '{}' fires at step {} but the timeline has {steps} steps",
                    trigger.trigger_name, trigger.target, trigger.timeline_step
                )));
            }
        }
        Ok(())
    }

    /// Timeline clock.
    pub fn clock(&self) -> &TimelineClock {
        &self.clock
    }

    /// Renderer configuration, if attached.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Attach or detach the renderer configuration.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Panels, in authoring order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Artwork layers, in authoring order.
    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    /// Captions, in authoring order.
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    /// Mutable captions, e.g. to schedule a layout.
    pub fn captions_mut(&mut self) -> &mut [Caption] {
        &mut self.captions
    }

    /// Audio instruments, in authoring order.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Animation triggers.
    pub fn triggers(&self) -> &TriggerTable {
        &self.triggers
    }

    /// Current sequencer resolution mode.
    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    /// Switch every sequencer between playback and random access.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.mode = mode;
        self.panels.iter_mut().for_each(|p| p.set_mode(mode));
        self.artworks.iter_mut().for_each(|a| a.set_mode(mode));
        self.captions.iter_mut().for_each(|c| c.set_mode(mode));
        self.instruments.iter_mut().for_each(|i| i.set_mode(mode));
    }

    /// Move the target step. Returns the change and the triggers it fired, or `None`
    /// when the move was refused at either end of the timeline.
    pub fn navigate(&mut self, nav: Navigation) -> Option<(StepChange, Vec<&AnimationTrigger>)> {
        let change = match nav {
            Navigation::Next => self.clock.increment_step()?,
            Navigation::Previous => self.clock.decrement_step()?,
            Navigation::First => self.clock.go_to_first(),
            Navigation::Last => self.clock.go_to_last(),
            Navigation::To(step) => self.clock.set_target_step(step),
        };
        Some((change, self.triggers.fired(change).collect()))
    }

    /// Place the interpolated step directly, e.g. while scrubbing.
    pub fn scrub_to(&mut self, interpolated_step: f64) {
        self.clock.set_interpolated_step(interpolated_step);
    }

    /// Ease the interpolated step toward the target by the scene's gesture rate.
    pub fn advance(&mut self, dt: f64) {
        self.clock.ease_toward_target(dt, self.gesture_rate);
    }

    /// Evaluate every visual entity against the current clock.
    #[tracing::instrument(
        skip(self, axes),
        fields(target = self.clock.target_step(), interpolated = self.clock.interpolated_step())
    )]
    pub fn tick(&mut self, axes: InputAxes, dt: f64) -> SceneFrame {
        let mut ctx = TickContext::new(&self.clock).with_axes(axes).with_dt(dt);
        if let Some(vp) = &self.viewport {
            ctx = ctx.with_viewport(vp);
        }

        let panels: Vec<PanelOutput> = self.panels.iter_mut().map(|p| p.update(&ctx)).collect();

        let homes: Vec<Vec3> = self.panels.iter().map(|p| p.options().home_position).collect();
        let artworks = self
            .artworks
            .iter_mut()
            .zip(&self.artwork_panels)
            .map(|(art, panel)| {
                let link = panel.map(|i| PanelLink {
                    home: homes[i],
                    output: &panels[i],
                });
                art.update(&ctx, link)
            })
            .collect();

        let captions = self
            .captions
            .iter_mut()
            .zip(&self.caption_panels)
            .map(|(caption, panel)| caption.update(&ctx, panel.map(|i| &panels[i])))
            .collect();

        SceneFrame {
            target_step: self.clock.target_step(),
            interpolated_step: self.clock.interpolated_step(),
            panels,
            artworks,
            captions,
        }
    }

    /// Drive every instrument against `sink`. Returns each instrument's voice volume.
    pub fn tick_audio(&mut self, dt: f64, sink: &mut dyn AudioSink) -> Vec<Option<f64>> {
        let ctx = TickContext::new(&self.clock).with_dt(dt);
        self.instruments
            .iter_mut()
            .map(|i| i.update(&ctx, sink))
            .collect()
    }
}

/// Give every panel without a home position one past the furthest panel on the x axis.
fn assign_home_positions(panels: &mut [Panel], spacing: f64) {
    for i in 0..panels.len() {
        if panels[i].options().home_position != Vec3::ZERO {
            continue;
        }
        let max_x = panels
            .iter()
            .map(|p| p.options().home_position.x)
            .fold(0.0, f64::max);
        panels[i].options_mut().home_position = Vec3::new(max_x + spacing, 0.0, 0.0);
        tracing::debug!(panel = panels[i].name(), x = max_x + spacing, "assigned home position");
    }
}

fn unique_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> PanoplyResult<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(PanoplyError::validation(format!("duplicate {kind} name '{name}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runtime.rs"]
mod tests;
