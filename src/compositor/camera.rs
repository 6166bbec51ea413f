use crate::foundation::core::{Rect, Vec3};
use crate::foundation::math::lerp;
use crate::layout::viewport::Viewport;
use crate::sequencer::resolve::Bracket;

/// Widest vertical field of view a camera may receive, in degrees.
pub const MAX_FOV: f64 = 180.0;

/// How a camera state orients the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrientationType {
    /// Absolute Euler rotation.
    #[default]
    Standard,
    /// Face a target point, then apply the Euler rotation on top.
    LookAt,
    /// Leave the camera's rotation alone.
    Inherited,
}

fn default_fov() -> f64 {
    60.0
}

fn default_look_at() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// One camera keyframe. Positions are relative to the panel's home position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraState {
    /// Authored vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub field_of_view: f64,
    /// Camera position.
    #[serde(default)]
    pub position: Vec3,
    /// Euler rotation in degrees.
    #[serde(default)]
    pub rotation: Vec3,
    /// Look-at target, used by [`OrientationType::LookAt`].
    #[serde(default = "default_look_at")]
    pub look_at: Vec3,
    /// Orientation mode.
    #[serde(default)]
    pub orientation_type: OrientationType,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            field_of_view: default_fov(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            look_at: default_look_at(),
            orientation_type: OrientationType::Standard,
        }
    }
}

/// Resolved camera orientation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Orientation {
    /// Absolute Euler rotation in degrees.
    Euler(Vec3),
    /// Face `target` (world space), then rotate by `euler`.
    LookAt {
        /// World-space point to face.
        target: Vec3,
        /// Additional local rotation in degrees.
        euler: Vec3,
    },
    /// Keep whatever rotation the camera already has.
    Inherited,
}

/// Camera transform for one tick, expressed as data for the renderer.
///
/// The renderer places the camera at `position`, applies `orientation`, then translates
/// by `local_translation` and rotates by `passive_rotation` in the camera's own space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraPose {
    /// Final vertical field of view in degrees.
    pub field_of_view: f64,
    /// World-space position (home plus interpolated state position).
    pub position: Vec3,
    /// Local translation: passive motion plus framing compensation.
    pub local_translation: Vec3,
    /// Passive-motion rotation in degrees.
    pub passive_rotation: Vec3,
    /// Orientation.
    pub orientation: Orientation,
}

/// Field of view before and after the viewport-height correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldOfView {
    /// Interpolated authored value.
    pub authored: f64,
    /// Corrected for screen height and resolution scale.
    pub reference: f64,
    /// Final value, cropped to the panel's pixel height and capped at [`MAX_FOV`].
    pub vertical: f64,
}

/// Scale an authored FOV to the device.
///
/// The steps run in a fixed order: screen/reference height, then resolution scale,
/// then the panel's share of the screen height, then the cap.
pub fn vertical_fov(authored: f64, viewport: &Viewport, viewport_pixel_height: f64) -> FieldOfView {
    let screen_height = viewport.device_size.height;
    let mut fov = authored;
    fov *= screen_height / viewport.reference_size.height;
    fov /= viewport.resolution_scale() * 2.0;
    let reference = fov;
    fov *= viewport_pixel_height / screen_height;
    FieldOfView {
        authored,
        reference,
        vertical: fov.min(MAX_FOV),
    }
}

/// Camera translation that keeps subjects at `distance` framed while the panel's
/// visible area is cropped by the screen edges.
///
/// `frame` is the panel rect, `visible` the same rect clipped to the device.
pub fn framing_offset(
    frame: Rect,
    visible: Rect,
    screen: Rect,
    distance: f64,
    fov: &FieldOfView,
) -> Vec3 {
    let height_diff = (frame.height() - visible.height()).abs();
    let mut v_offset = distance * (fov.reference.to_radians() * 0.5).tan();
    if frame.y0 > 0.0 {
        v_offset = -v_offset;
    }
    let width_diff = (frame.width() - visible.width()).abs();
    let mut h_offset = distance * (fov.authored.to_radians() * 0.5).tan();
    if frame.x0 > 0.0 {
        h_offset = -h_offset;
    }
    Vec3::new(
        width_diff / screen.width() * h_offset,
        height_diff / screen.height() * v_offset,
        0.0,
    )
}

/// Interpolated orientation. The mode follows the earlier state.
pub fn orientation(a: &CameraState, b: &CameraState, progress: f64, home: Vec3) -> Orientation {
    let euler = lerp(&a.rotation, &b.rotation, progress);
    match a.orientation_type {
        OrientationType::Standard => Orientation::Euler(euler),
        OrientationType::LookAt => Orientation::LookAt {
            target: lerp(&a.look_at, &b.look_at, progress) + home,
            euler,
        },
        OrientationType::Inherited => Orientation::Inherited,
    }
}

/// Authored FOV and world position for a bracket, when both states resolved.
pub fn interpolate(bracket: &Bracket<'_, CameraState>, home: Vec3) -> Option<(f64, Vec3, Orientation)> {
    let (a, b) = bracket.pair()?;
    let t = bracket.progress;
    Some((
        lerp(&a.field_of_view, &b.field_of_view, t),
        home + lerp(&a.position, &b.position, t),
        orientation(a, b, t, home),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/camera.rs"]
mod tests;
