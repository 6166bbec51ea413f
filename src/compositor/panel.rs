use crate::compositor::camera::{self, CameraPose, CameraState};
use crate::compositor::passive::{MotionOffset, PassiveMotion, PassiveMotionState};
use crate::foundation::core::{Rect, Rgba, Vec2, Vec3, rect_xywh};
use crate::foundation::math::{lerp, overlaps, round_half_even};
use crate::layout::frame::FrameState;
use crate::layout::solver::compute_rect;
use crate::layout::viewport::Viewport;
use crate::sequencer::resolve::{Bracket, Sequencer, SequencerMode, StepCursor};
use crate::timeline::tick::TickContext;

/// Offset added to the red channel of an opaque black matte so renderers still draw it.
const BLACK_MATTE_NUDGE: f64 = 0.001;

fn default_framing_distance() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

/// Per-panel settings that are not keyframed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelOptions {
    /// World-space origin of the panel's camera rig.
    #[serde(default)]
    pub home_position: Vec3,
    /// Translate the camera to keep subjects framed while the panel is cropped.
    #[serde(default)]
    pub preserve_framing: bool,
    /// Subject distance used by `preserve_framing`.
    #[serde(default = "default_framing_distance")]
    pub framing_distance: f64,
    /// Leave the camera transform and FOV to someone else.
    #[serde(default)]
    pub disable_camera_control: bool,
    /// Blend into the previous step; when false, backward transitions snap.
    #[serde(default = "default_true")]
    pub interpolate_previous: bool,
    /// Blend into the next step; when false, forward transitions snap.
    #[serde(default = "default_true")]
    pub interpolate_next: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            home_position: Vec3::ZERO,
            preserve_framing: false,
            framing_distance: default_framing_distance(),
            disable_camera_control: false,
            interpolate_previous: true,
            interpolate_next: true,
        }
    }
}

/// Everything a panel produces in one tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PanelOutput {
    /// Blend factor shared by every component of the panel.
    pub progress: f64,
    /// Rounded panel rect in device pixels.
    pub frame_rect: Rect,
    /// Interpolated rect ignoring margins (not rounded).
    pub marginless_rect: Rect,
    /// Whether the panel's camera should render.
    pub camera_enabled: bool,
    /// Border thickness in pixels.
    pub border_size: f64,
    /// Border colour.
    pub border_color: Rgba,
    /// Matte colour.
    pub matte_color: Rgba,
    /// Camera transform; `None` before any pose was computed or when camera control is off.
    pub camera: Option<CameraPose>,
    /// Eased horizontal passive-motion offset.
    pub passive_h: MotionOffset,
    /// Eased vertical passive-motion offset.
    pub passive_v: MotionOffset,
}

/// A window onto the scene: an animated frame rect plus the camera rendering into it.
///
/// Frame, camera and both passive-motion sequencers share one cursor per tick.
#[derive(Debug)]
pub struct Panel {
    name: String,
    start_index: usize,
    frames: Sequencer<FrameState>,
    cameras: Sequencer<CameraState>,
    passive_h: Sequencer<PassiveMotionState>,
    passive_v: Sequencer<PassiveMotionState>,
    options: PanelOptions,
    motion_h: PassiveMotion,
    motion_v: PassiveMotion,
    last_pose: Option<CameraPose>,
}

impl Panel {
    /// Assemble a panel from its four sequencers.
    pub fn new(
        name: impl Into<String>,
        frames: Sequencer<FrameState>,
        cameras: Sequencer<CameraState>,
        passive_h: Sequencer<PassiveMotionState>,
        passive_v: Sequencer<PassiveMotionState>,
        options: PanelOptions,
    ) -> Self {
        Self {
            name: name.into(),
            start_index: frames.start_index(),
            frames,
            cameras,
            passive_h,
            passive_v,
            options,
            motion_h: PassiveMotion::default(),
            motion_v: PassiveMotion::default(),
            last_pose: None,
        }
    }

    /// Panel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-keyframed settings.
    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    /// Mutable access to the non-keyframed settings.
    pub fn options_mut(&mut self) -> &mut PanelOptions {
        &mut self.options
    }

    /// Frame sequencer.
    pub fn frames(&self) -> &Sequencer<FrameState> {
        &self.frames
    }

    /// Camera sequencer.
    pub fn cameras(&self) -> &Sequencer<CameraState> {
        &self.cameras
    }

    /// Switch every sequencer's resolution mode.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.frames.set_mode(mode);
        self.cameras.set_mode(mode);
        self.passive_h.set_mode(mode);
        self.passive_v.set_mode(mode);
    }

    /// Drop every sequencer's hold cache, e.g. after scrubbing.
    pub fn invalidate_caches(&self) {
        self.frames.invalidate_cache();
        self.cameras.invalidate_cache();
        self.passive_h.invalidate_cache();
        self.passive_v.invalidate_cache();
    }

    fn progress(&self, cursor: StepCursor) -> f64 {
        let p = cursor.progress();
        if cursor.is_backward() {
            if self.options.interpolate_previous { p } else { p.floor() }
        } else if self.options.interpolate_next {
            p
        } else {
            p.ceil()
        }
    }

    /// Advance the panel by one tick.
    #[tracing::instrument(skip(self, ctx), fields(panel = %self.name))]
    pub fn update(&mut self, ctx: &TickContext<'_>) -> PanelOutput {
        let cursor = StepCursor::from_clock(ctx.clock, self.start_index);
        let progress = self.progress(cursor);

        let frames = self.frames.bracket(cursor).with_progress(progress);
        let cameras = self.cameras.bracket_holding_last(cursor).with_progress(progress);
        let passive_h = self.passive_h.bracket_holding_last(cursor).with_progress(progress);
        let passive_v = self.passive_v.bracket_holding_last(cursor).with_progress(progress);

        let mut out = match frames.pair() {
            Some((a, b)) => frame_output(a, b, progress, ctx.viewport),
            None => PanelOutput {
                progress,
                frame_rect: Rect::ZERO,
                marginless_rect: Rect::ZERO,
                camera_enabled: false,
                border_size: 0.0,
                border_color: Rgba::BLACK,
                matte_color: Rgba::BLACK,
                camera: None,
                passive_h: MotionOffset::default(),
                passive_v: MotionOffset::default(),
            },
        };
        if out.matte_color == Rgba::BLACK {
            out.matte_color.r += BLACK_MATTE_NUDGE;
        }

        out.passive_h = self.motion_h.update(&passive_h, &ctx.axes, ctx.dt);
        out.passive_v = self.motion_v.update(&passive_v, &ctx.axes, ctx.dt);

        if !self.options.disable_camera_control {
            if let Some(pose) = self.pose(&cameras, out.frame_rect, ctx.viewport) {
                self.last_pose = Some(pose);
            }
            out.camera = self.last_pose;
        }

        if let Some(vp) = ctx.viewport
            && overlaps(&vp.screen_rect(), &out.frame_rect)
        {
            out.camera_enabled = out.frame_rect.width() > 1.5 && out.frame_rect.height() > 1.5;
        }
        out
    }

    fn pose(
        &self,
        cameras: &Bracket<'_, CameraState>,
        frame_rect: Rect,
        viewport: Option<&Viewport>,
    ) -> Option<CameraPose> {
        let viewport = viewport?;
        let home = self.options.home_position;
        let (authored, position, orientation) = camera::interpolate(cameras, home)?;

        let visible = frame_rect.intersect(viewport.device_rect());
        let fov = camera::vertical_fov(authored, viewport, visible.height());

        let mut local = self.motion_h.applied().translation + self.motion_v.applied().translation;
        if self.options.preserve_framing {
            local += camera::framing_offset(
                frame_rect,
                visible,
                viewport.screen_rect(),
                self.options.framing_distance,
                &fov,
            );
        }

        Some(CameraPose {
            field_of_view: fov.vertical,
            position,
            local_translation: local,
            passive_rotation: self.motion_h.applied().rotation + self.motion_v.applied().rotation,
            orientation,
        })
    }
}

/// Keep an offscreen rect's partner size so overlays stay attached while the panel
/// slides out, anchoring the far edge when it left past the left or bottom.
fn freeze_offscreen(rect: Rect, other: Rect, screen: Rect) -> Rect {
    if overlaps(&screen, &rect) {
        return rect;
    }
    let mut x = rect.x0;
    let mut y = rect.y0;
    if rect.x1 <= screen.x0 {
        x = rect.x1 - other.width();
    }
    if rect.y1 <= screen.y0 {
        y = rect.y1 - other.height();
    }
    rect_xywh(x, y, other.width(), other.height())
}

fn blend_rect(a: Rect, b: Rect, t: f64) -> (Vec2, Vec2) {
    let pos = lerp(&Vec2::new(a.x0, a.y0), &Vec2::new(b.x0, b.y0), t);
    let size = lerp(
        &Vec2::new(a.width(), a.height()),
        &Vec2::new(b.width(), b.height()),
        t,
    );
    (pos, Vec2::new(size.x.max(1.0), size.y.max(1.0)))
}

fn camera_visible(frame: Rect, screen: Rect) -> bool {
    let (w, h) = (frame.width(), frame.height());
    let (dx, dy) = (frame.x0 - screen.x0, frame.y0 - screen.y0);
    overlaps(&screen, &frame)
        && w >= 1.0
        && h >= 1.0
        && dx + w >= 1.0
        && dy + h >= 1.0
        && screen.height() - dy >= 1.0
        && screen.width() - dx >= 1.0
}

fn frame_output(a: &FrameState, b: &FrameState, progress: f64, viewport: Option<&Viewport>) -> PanelOutput {
    let screen = viewport.map(Viewport::screen_rect).unwrap_or(Rect::ZERO);

    let rect_a = compute_rect(a, viewport, true).rect;
    let rect_b = compute_rect(b, viewport, true).rect;
    let rect_a = freeze_offscreen(rect_a, rect_b, screen);
    let rect_b = freeze_offscreen(rect_b, rect_a, screen);

    let (pos, size) = blend_rect(rect_a, rect_b, progress);
    let frame_rect = rect_xywh(
        round_half_even(pos.x),
        round_half_even(pos.y),
        round_half_even(size.x),
        round_half_even(size.y),
    );

    let (pos, size) = blend_rect(
        compute_rect(a, viewport, false).rect,
        compute_rect(b, viewport, false).rect,
        progress,
    );

    PanelOutput {
        progress,
        frame_rect,
        marginless_rect: rect_xywh(pos.x, pos.y, size.x, size.y),
        camera_enabled: camera_visible(frame_rect, screen),
        border_size: lerp(&a.border_size, &b.border_size, progress),
        border_color: lerp(&a.border_color, &b.border_color, progress),
        matte_color: lerp(&a.matte_color, &b.matte_color, progress),
        camera: None,
        passive_h: MotionOffset::default(),
        passive_v: MotionOffset::default(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/panel.rs"]
mod tests;
