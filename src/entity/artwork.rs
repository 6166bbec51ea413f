use crate::compositor::panel::PanelOutput;
use crate::foundation::core::{Rect, Rgba, Vec2, Vec3};
use crate::foundation::math::lerp;
use crate::layout::frame::{PositionAlignHorz, PositionAlignVert, PositionUnits};
use crate::sequencer::resolve::{Sequencer, SequencerMode, StepCursor};
use crate::timeline::tick::TickContext;

/// Space an artwork's keyframed position is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ArtworkPositionType {
    /// World space, offset by the linked panel's home position.
    #[default]
    Panel,
    /// Relative to the artwork's parent.
    Local,
    /// Plain world space.
    Global,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// One artwork keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArtworkState {
    /// Position in the space selected by [`ArtworkPositionType`].
    #[serde(default)]
    pub position: Vec3,
    /// Euler rotation in degrees.
    #[serde(default)]
    pub rotation: Vec3,
    /// Local scale.
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Tint.
    #[serde(default)]
    pub color: Rgba,
    /// Horizontal overlay offset, see [`ArtworkState::position_for_rect`].
    #[serde(default)]
    pub x: f64,
    /// Edge `x` is measured from.
    #[serde(default = "default_h_align")]
    pub h_align: PositionAlignHorz,
    /// Units of `x`.
    #[serde(default)]
    pub h_units: PositionUnits,
    /// Vertical overlay offset.
    #[serde(default)]
    pub y: f64,
    /// Edge `y` is measured from.
    #[serde(default = "default_v_align")]
    pub v_align: PositionAlignVert,
    /// Units of `y`.
    #[serde(default)]
    pub v_units: PositionUnits,
}

fn default_h_align() -> PositionAlignHorz {
    PositionAlignHorz::Left
}

fn default_v_align() -> PositionAlignVert {
    PositionAlignVert::Top
}

impl Default for ArtworkState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            color: Rgba::WHITE,
            x: 0.0,
            h_align: default_h_align(),
            h_units: PositionUnits::Pixels,
            y: 0.0,
            v_align: default_v_align(),
            v_units: PositionUnits::Pixels,
        }
    }
}

impl ArtworkState {
    /// Overlay position inside `rect` (y-up, relative to the rect origin).
    ///
    /// Pixel offsets are multiplied by `scale`; percent offsets are shares of the rect size.
    pub fn position_for_rect(&self, rect: Rect, scale: f64) -> Vec2 {
        let (w, h) = (rect.width(), rect.height());
        let dx = match self.h_units {
            PositionUnits::Pixels => self.x * scale,
            PositionUnits::Percent => self.x * 0.01 * w,
        };
        let dy = match self.v_units {
            PositionUnits::Pixels => self.y * scale,
            PositionUnits::Percent => self.y * 0.01 * h,
        };
        let x = match self.h_align {
            PositionAlignHorz::Left => dx,
            PositionAlignHorz::Center => w * 0.5 + dx,
            PositionAlignHorz::Right => w - dx,
        };
        let y = match self.v_align {
            PositionAlignVert::Bottom => dy,
            PositionAlignVert::Middle => h * 0.5 + dy,
            PositionAlignVert::Top => h - dy,
        };
        Vec2::new(x, y)
    }
}

fn default_scale_factor() -> f64 {
    5.0
}

/// Non-keyframed artwork settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArtworkOptions {
    /// Space of the keyframed position.
    #[serde(default)]
    pub position_type: ArtworkPositionType,
    /// Scale with camera distance so the artwork keeps its apparent size.
    #[serde(default)]
    pub maintain_scale: bool,
    /// Multiplier for `maintain_scale`.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Name of the panel the artwork belongs to.
    #[serde(default)]
    pub panel: Option<String>,
}

impl Default for ArtworkOptions {
    fn default() -> Self {
        Self {
            position_type: ArtworkPositionType::Panel,
            maintain_scale: false,
            scale_factor: default_scale_factor(),
            panel: None,
        }
    }
}

/// What an artwork reads from its panel during a tick.
#[derive(Clone, Copy, Debug)]
pub struct PanelLink<'a> {
    /// Panel home position.
    pub home: Vec3,
    /// The panel's output for the same tick.
    pub output: &'a PanelOutput,
}

/// Artwork transform for one tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ArtworkOutput {
    /// Tint.
    pub color: Rgba,
    /// Position in the space named by `position_type`.
    pub position: Vec3,
    /// Space of `position`.
    pub position_type: ArtworkPositionType,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    /// Local scale.
    pub scale: Vec3,
}

/// An animated layer of content inside a panel.
#[derive(Debug)]
pub struct Artwork {
    name: String,
    states: Sequencer<ArtworkState>,
    options: ArtworkOptions,
    last_scale: Vec3,
}

impl Artwork {
    /// Build an [`Artwork`] value.
    pub fn new(name: impl Into<String>, states: Sequencer<ArtworkState>, options: ArtworkOptions) -> Self {
        Self {
            name: name.into(),
            states,
            options,
            last_scale: Vec3::ONE,
        }
    }

    /// Artwork name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-keyframed settings.
    pub fn options(&self) -> &ArtworkOptions {
        &self.options
    }

    /// Switch the sequencer's resolution mode.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.states.set_mode(mode);
    }

    /// Keyframe sequencer.
    pub fn states(&self) -> &Sequencer<ArtworkState> {
        &self.states
    }

    /// Interpolate the artwork for this tick.
    ///
    /// Returns `None` when either bracketing state is missing, or during playback while
    /// the surrounding script entries are all holds.
    pub fn update(&mut self, ctx: &TickContext<'_>, panel: Option<PanelLink<'_>>) -> Option<ArtworkOutput> {
        let cursor = StepCursor::from_clock(ctx.clock, self.states.start_index());
        if self.states.mode() == SequencerMode::MonotonicPlayback && self.states.in_hold_run(cursor) {
            return None;
        }
        let bracket = self.states.bracket(cursor);
        let (a, b) = bracket.pair()?;
        let t = bracket.progress;

        let mut position = lerp(&a.position, &b.position, t);
        if self.options.position_type == ArtworkPositionType::Panel
            && let Some(link) = panel
        {
            position += link.home;
        }

        let scale = if self.options.maintain_scale {
            if let Some(r) = panel.and_then(|link| self.distance_scale(ctx, link, position)) {
                self.last_scale = Vec3::splat(r);
            }
            self.last_scale
        } else {
            lerp(&a.scale, &b.scale, t)
        };

        Some(ArtworkOutput {
            color: lerp(&a.color, &b.color, t),
            position,
            position_type: self.options.position_type,
            rotation: lerp(&a.rotation, &b.rotation, t),
            scale,
        })
    }

    fn distance_scale(&self, ctx: &TickContext<'_>, link: PanelLink<'_>, position: Vec3) -> Option<f64> {
        let viewport = ctx.viewport?;
        let pose = link.output.camera?;
        let d = (position.z - pose.position.z).abs();
        let r = d
            / (pose.field_of_view
                * (viewport.screen_rect().height() / link.output.frame_rect.height()));
        r.is_finite().then_some(r * self.options.scale_factor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/artwork.rs"]
mod tests;
