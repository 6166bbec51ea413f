use crate::foundation::core::Vec3;
use crate::foundation::math::{Lerp, inverse_lerp, lerp};
use crate::sequencer::resolve::Bracket;
use crate::timeline::tick::InputAxes;

/// Rate of the exponential ease applied to passive offsets, per second.
const EASE_RATE: f64 = 10.0;

/// Controller axis a passive-motion state listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ControllerInput {
    /// [`InputAxes::horizontal_tilt`].
    #[default]
    HorizontalTilt,
    /// [`InputAxes::vertical_tilt`].
    VerticalTilt,
}

/// Whether the mapped value moves or rotates the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputType {
    /// Local camera translation.
    #[default]
    Position,
    /// Camera rotation in degrees.
    Rotation,
}

/// Component receiving the mapped value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputProperty {
    /// X component.
    #[default]
    X,
    /// Y component.
    Y,
    /// Z component.
    Z,
}

/// One passive-motion keyframe: a clamped linear remap from a controller axis to a
/// camera translation or rotation component.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PassiveMotionState {
    /// Axis read from [`InputAxes`].
    pub input: ControllerInput,
    /// Input value mapped to `output_min`.
    pub input_min: f64,
    /// Input value mapped to `output_max`.
    pub input_max: f64,
    /// Translation or rotation.
    pub output: OutputType,
    /// Target component.
    pub output_property: OutputProperty,
    /// Output at `input_min`.
    pub output_min: f64,
    /// Output at `input_max`.
    pub output_max: f64,
}

impl Default for PassiveMotionState {
    fn default() -> Self {
        Self {
            input: ControllerInput::HorizontalTilt,
            input_min: -1.0,
            input_max: 1.0,
            output: OutputType::Position,
            output_property: OutputProperty::X,
            output_min: -1.0,
            output_max: 1.0,
        }
    }
}

impl PassiveMotionState {
    /// Map a raw input value through the clamped remap.
    pub fn output_for(&self, input: f64) -> f64 {
        lerp(
            &self.output_min,
            &self.output_max,
            inverse_lerp(self.input_min, self.input_max, input),
        )
    }

    /// Offset produced by this state for the given controller axes.
    pub fn offset(&self, axes: &InputAxes) -> MotionOffset {
        let raw = match self.input {
            ControllerInput::HorizontalTilt => axes.horizontal_tilt,
            ControllerInput::VerticalTilt => axes.vertical_tilt,
        };
        let value = self.output_for(raw);
        let mut component = Vec3::ZERO;
        match self.output_property {
            OutputProperty::X => component.x = value,
            OutputProperty::Y => component.y = value,
            OutputProperty::Z => component.z = value,
        }
        match self.output {
            OutputType::Position => MotionOffset {
                translation: component,
                rotation: Vec3::ZERO,
            },
            OutputType::Rotation => MotionOffset {
                translation: Vec3::ZERO,
                rotation: component,
            },
        }
    }
}

/// Camera translation and rotation contributed by passive motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct MotionOffset {
    /// Local translation.
    pub translation: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
}

impl Lerp for MotionOffset {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translation: Vec3::lerp(&a.translation, &b.translation, t),
            rotation: Vec3::lerp(&a.rotation, &b.rotation, t),
        }
    }
}

/// Eased passive-motion offset for one axis of a panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassiveMotion {
    applied: MotionOffset,
}

impl PassiveMotion {
    /// Offset currently applied to the camera.
    pub fn applied(&self) -> MotionOffset {
        self.applied
    }

    /// Blended target offset for a bracket; `None` unless both states resolved.
    pub fn target(bracket: &Bracket<'_, PassiveMotionState>, axes: &InputAxes) -> Option<MotionOffset> {
        let (a, b) = bracket.pair()?;
        Some(lerp(&a.offset(axes), &b.offset(axes), bracket.progress))
    }

    /// Ease the applied offset toward the bracket's target by `dt * 10`.
    ///
    /// Unresolved brackets leave the applied offset where it was.
    pub fn update(
        &mut self,
        bracket: &Bracket<'_, PassiveMotionState>,
        axes: &InputAxes,
        dt: f64,
    ) -> MotionOffset {
        if let Some(target) = Self::target(bracket, axes) {
            self.applied = lerp(&self.applied, &target, dt * EASE_RATE);
        }
        self.applied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/passive.rs"]
mod tests;
