use crate::compositor::panel::PanelOutput;
use crate::foundation::core::{Rect, Rgba, Vec2};
use crate::foundation::math::{lerp, round_half_even};
use crate::layout::frame::PositionUnits;
use crate::sequencer::resolve::{Sequencer, SequencerMode, StepCursor};
use crate::timeline::tick::TickContext;

/// Rate at which a freshly shown tail grows to full length, per second.
const TAIL_GROW_RATE: f64 = 10.0;
/// The tail points "down" at zero rotation.
const TAIL_ROTATION_OFFSET_DEG: f64 = -90.0;
/// Frames at or below this size (either axis) leave the caption unplaced.
const MIN_FRAME_EXTENT: f64 = 10.0;

/// Horizontal anchoring of a tailless caption inside its panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CaptionHorzAlign {
    /// Offset from the left edge.
    #[default]
    Left,
    /// Offset from the centre.
    Center,
    /// Offset from the right edge.
    Right,
}

/// Vertical anchoring of a tailless caption inside its panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CaptionVertAlign {
    /// Offset from the top edge.
    #[default]
    Top,
    /// Offset from the centre.
    Center,
    /// Offset from the bottom edge.
    Bottom,
}

/// Axis-aligned box in GUI space (y-down from the top of the screen).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutBox {
    /// Left.
    pub x: f64,
    /// Top.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl LayoutBox {
    /// Build a [`LayoutBox`] value.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn rounded(self) -> Self {
        Self::new(
            round_half_even(self.x),
            round_half_even(self.y),
            round_half_even(self.width),
            round_half_even(self.height),
        )
    }
}

/// One caption keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionState {
    /// Offset and unscaled size. With a tail, `x`/`y` are shares of the frame size.
    pub layout: LayoutBox,
    /// Units of `layout.x` for tailless captions.
    pub offset_units_x: PositionUnits,
    /// Units of `layout.y` for tailless captions.
    pub offset_units_y: PositionUnits,
    /// Caption text.
    pub text: String,
    /// Drop-shadow offset in pixels.
    pub drop_shadow: Vec2,
    /// Drop-shadow colour.
    pub drop_shadow_color: Rgba,
    /// Tail wedge width in degrees.
    pub tail_width: f64,
    /// Tail length in reference pixels.
    pub tail_height: f64,
    /// Tail direction in degrees.
    pub tail_rotation: f64,
    /// Text and balloon colour.
    pub color: Rgba,
    /// Draw a speech-balloon tail.
    pub draw_tail: bool,
    /// Vertical anchoring.
    pub vert_align: CaptionVertAlign,
    /// Horizontal anchoring.
    pub horz_align: CaptionHorzAlign,
    /// Balloon corner radius as a share of the half width.
    pub corner_rounding: f64,
}

impl Default for CaptionState {
    fn default() -> Self {
        Self {
            layout: LayoutBox::new(10.0, 10.0, 200.0, 70.0),
            offset_units_x: PositionUnits::Pixels,
            offset_units_y: PositionUnits::Pixels,
            text: "Hello world.".to_owned(),
            drop_shadow: Vec2::ZERO,
            drop_shadow_color: Rgba::BLACK,
            tail_width: 40.0,
            tail_height: 200.0,
            tail_rotation: 0.0,
            color: Rgba::WHITE,
            draw_tail: false,
            vert_align: CaptionVertAlign::Top,
            horz_align: CaptionHorzAlign::Left,
            corner_rounding: 0.11,
        }
    }
}

/// Speech-balloon tail placement.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TailGeometry {
    /// Balloon box in GUI pixels.
    pub pixel_position: LayoutBox,
    /// Tip position relative to the balloon centre.
    pub tip_offset: Vec2,
    /// Grow-in factor, `0..=1`.
    pub progress: f64,
    /// Drop shadow expressed in the tail's rotated frame.
    pub drop_shadow_offset: Vec2,
}

/// Caption placement for one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionOutput {
    /// Text of the nearer keyframe.
    pub text: String,
    /// Placed box. Tailless captions are absolute and rounded; tailed captions keep the
    /// interpolated offset with a scaled size.
    pub layout: LayoutBox,
    /// Drop-shadow offset.
    pub drop_shadow: Vec2,
    /// Drop-shadow colour.
    pub drop_shadow_color: Rgba,
    /// Tail wedge width in degrees.
    pub tail_width: f64,
    /// Tail length in device pixels.
    pub tail_height: f64,
    /// Tail direction in degrees.
    pub tail_rotation: f64,
    /// Colour.
    pub color: Rgba,
    /// Corner rounding ratio.
    pub corner_rounding: f64,
    /// Anchoring copied from the nearer keyframe.
    pub horz_align: CaptionHorzAlign,
    /// Anchoring copied from the nearer keyframe.
    pub vert_align: CaptionVertAlign,
    /// Tail placement when the nearer keyframe draws one.
    pub tail: Option<TailGeometry>,
}

/// A text caption or speech balloon attached to a panel.
#[derive(Debug)]
pub struct Caption {
    name: String,
    states: Sequencer<CaptionState>,
    panel: Option<String>,
    enabled: bool,
    layout_pending: bool,
    tail_progress: f64,
}

impl Caption {
    /// Build a caption. Its first layout is scheduled for the next tick.
    pub fn new(name: impl Into<String>, states: Sequencer<CaptionState>, panel: Option<String>) -> Self {
        Self {
            name: name.into(),
            states,
            panel,
            enabled: true,
            layout_pending: true,
            tail_progress: 0.0,
        }
    }

    /// Caption name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the panel the caption is attached to.
    pub fn panel(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    /// Switch the sequencer's resolution mode.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.states.set_mode(mode);
    }

    /// Keyframe sequencer.
    pub fn states(&self) -> &Sequencer<CaptionState> {
        &self.states
    }

    /// Whether the caption updates every tick.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable per-tick updates.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Request one layout pass on the next tick, even while disabled.
    pub fn schedule_layout(&mut self) {
        self.layout_pending = true;
    }

    /// Whether a scheduled layout is still waiting for a tick.
    pub fn is_layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Current tail grow-in factor.
    pub fn tail_progress(&self) -> f64 {
        self.tail_progress
    }

    /// Place the caption against its panel's output for this tick.
    ///
    /// Returns `None` while disabled (and no layout is scheduled), when either
    /// bracketing state is missing, without a viewport, or when the frame is too small.
    pub fn update(&mut self, ctx: &TickContext<'_>, panel: Option<&PanelOutput>) -> Option<CaptionOutput> {
        let scheduled = std::mem::take(&mut self.layout_pending);
        if !self.enabled && !scheduled {
            return None;
        }

        let cursor = StepCursor::from_clock(ctx.clock, self.states.start_index());
        let bracket = self.states.bracket(cursor);
        let (a, b) = bracket.pair()?;
        let q = bracket.nearest()?;
        let t = bracket.progress;

        let viewport = ctx.viewport?;
        let resolution_scale = viewport.resolution_scale();
        if resolution_scale == 0.0 {
            return None;
        }
        let frame = panel?.frame_rect;
        if !(frame.width() > MIN_FRAME_EXTENT && frame.height() > MIN_FRAME_EXTENT) {
            return None;
        }

        let gui_scale = resolution_scale / 0.5;
        let offset = |s: &CaptionState| {
            let x = if s.offset_units_x == PositionUnits::Pixels || q.draw_tail {
                s.layout.x
            } else {
                frame.width() * (s.layout.x * 0.01)
            };
            let y = if s.offset_units_y == PositionUnits::Pixels || q.draw_tail {
                s.layout.y
            } else {
                frame.height() * (s.layout.y * 0.01)
            };
            Vec2::new(x, y)
        };
        let pos = lerp(&offset(a), &offset(b), t);
        let size = lerp(
            &Vec2::new(a.layout.width, a.layout.height),
            &Vec2::new(b.layout.width, b.layout.height),
            t,
        );
        let layout = LayoutBox::new(pos.x, pos.y, size.x * gui_scale, size.y * gui_scale);

        let mut out = CaptionOutput {
            text: q.text.clone(),
            layout,
            drop_shadow: lerp(&a.drop_shadow, &b.drop_shadow, t),
            drop_shadow_color: lerp(&a.drop_shadow_color, &b.drop_shadow_color, t),
            tail_width: lerp(&a.tail_width, &b.tail_width, t),
            tail_height: lerp(&a.tail_height, &b.tail_height, t) * gui_scale,
            tail_rotation: lerp(&a.tail_rotation, &b.tail_rotation, t),
            color: lerp(&a.color, &b.color, t),
            corner_rounding: lerp(&a.corner_rounding, &b.corner_rounding, t),
            horz_align: q.horz_align,
            vert_align: q.vert_align,
            tail: None,
        };

        let screen_height = viewport.device_size.height;
        if q.draw_tail {
            self.tail_progress = if q.color.a == 1.0 {
                lerp(&self.tail_progress, &1.0, ctx.dt * TAIL_GROW_RATE)
            } else {
                0.0
            };
            out.tail = Some(tail_geometry(&out, frame, screen_height, self.tail_progress));
        } else {
            out.layout = align_to_frame(out.layout, q, frame, screen_height);
        }
        Some(out)
    }
}

fn tail_geometry(out: &CaptionOutput, frame: Rect, screen_height: f64, progress: f64) -> TailGeometry {
    let layout = out.layout;
    let pixel_position = LayoutBox::new(
        frame.x0 + frame.width() * layout.x,
        screen_height - frame.y0 - frame.height() + frame.height() * layout.y,
        layout.width,
        layout.height,
    );

    let rad = out.tail_rotation.to_radians();
    let tail_offset = lerp(
        &(pixel_position.width * 0.5),
        &(pixel_position.height * 0.5),
        rad.cos().abs(),
    ) * (0.75 * (out.tail_height / 200.0));
    let reach = tail_offset + out.tail_height;
    let tip_angle = rad + TAIL_ROTATION_OFFSET_DEG.to_radians();

    let shadow_angle = out.drop_shadow.y.atan2(out.drop_shadow.x) - rad;
    let shadow_len = out.drop_shadow.hypot();

    TailGeometry {
        pixel_position,
        tip_offset: Vec2::new(reach * tip_angle.cos(), reach * tip_angle.sin()),
        progress,
        drop_shadow_offset: Vec2::new(shadow_len * shadow_angle.cos(), shadow_len * shadow_angle.sin()),
    }
}

/// Anchor a tailless caption inside `frame`, flipping y into GUI space, then round.
fn align_to_frame(layout: LayoutBox, q: &CaptionState, frame: Rect, screen_height: f64) -> LayoutBox {
    let (fx, fy, fw, fh) = (frame.x0, frame.y0, frame.width(), frame.height());
    let x = match q.horz_align {
        CaptionHorzAlign::Left => fx + layout.x,
        CaptionHorzAlign::Center => fx + fw * 0.5 - layout.width * 0.5 + layout.x,
        CaptionHorzAlign::Right => fx + fw - layout.width - layout.x,
    };
    let y = match q.vert_align {
        CaptionVertAlign::Top => screen_height - (fy + fh) + layout.y,
        CaptionVertAlign::Center => screen_height - (fy + fh) + fh * 0.5 - layout.height * 0.5 + layout.y,
        CaptionVertAlign::Bottom => screen_height - fy - layout.height - layout.y,
    };
    LayoutBox::new(x, y, layout.width, layout.height).rounded()
}

#[cfg(test)]
#[path = "../../tests/unit/entity/caption.rs"]
mod tests;
