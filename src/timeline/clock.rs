use crate::foundation::error::{PanoplyError, PanoplyResult};
use crate::foundation::math::lerp;

/// Default rate at which the interpolated step eases toward the target step.
pub const DEFAULT_GESTURE_RATE: f64 = 5.0;

/// Which end of the timeline a scene is entered from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SceneEntry {
    /// Start at the first step.
    #[default]
    Forward,
    /// Start at the last step (arriving from a later scene).
    Backward,
}

/// Direction of a step transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `new > old`.
    Forward,
    /// `new <= old`.
    Backward,
}

/// Notification emitted by every target-step mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepChange {
    /// Target step before the mutation.
    pub old: usize,
    /// Target step after the mutation.
    pub new: usize,
}

impl StepChange {
    /// Direction of travel. Unchanged targets count as backward.
    pub fn direction(self) -> Direction {
        if self.old < self.new {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Current position on the global step axis.
///
/// The clock is an explicit value: the input collaborator mutates it once per tick,
/// then every entity reads the same snapshot through a shared borrow.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineClock {
    target_step: usize,
    interpolated_step: f64,
    step_count: usize,
}

impl TimelineClock {
    /// Create a clock at step 0 for a timeline of `step_count` steps.
    pub fn new(step_count: usize) -> PanoplyResult<Self> {
        Self::starting_at(step_count, SceneEntry::Forward)
    }

    /// Create a clock positioned at the requested end of the timeline.
    pub fn starting_at(step_count: usize, entry: SceneEntry) -> PanoplyResult<Self> {
        if step_count == 0 {
            return Err(PanoplyError::validation("timeline step_count must be > 0"));
        }
        let start = match entry {
            SceneEntry::Forward => 0,
            SceneEntry::Backward => step_count - 1,
        };
        Ok(Self {
            target_step: start,
            interpolated_step: start as f64,
            step_count,
        })
    }

    /// Build a clock snapshot from raw values, clamping both into range.
    pub fn at(step_count: usize, target_step: usize, interpolated_step: f64) -> PanoplyResult<Self> {
        let mut clock = Self::new(step_count)?;
        clock.target_step = target_step.min(clock.last_step());
        clock.set_interpolated_step(interpolated_step);
        Ok(clock)
    }

    /// Discrete target step.
    pub fn target_step(&self) -> usize {
        self.target_step
    }

    /// Continuous position; trails the target during transitions.
    pub fn interpolated_step(&self) -> f64 {
        self.interpolated_step
    }

    /// Number of steps in the timeline.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    fn last_step(&self) -> usize {
        self.step_count - 1
    }

    /// Whether the interpolated step has settled on the target.
    pub fn is_settled(&self) -> bool {
        self.interpolated_step == self.target_step as f64
    }

    /// Advance the target by one step unless already at the last step.
    pub fn increment_step(&mut self) -> Option<StepChange> {
        if self.target_step < self.last_step() {
            Some(self.retarget(self.target_step + 1))
        } else {
            None
        }
    }

    /// Move the target back by one step unless already at step 0.
    pub fn decrement_step(&mut self) -> Option<StepChange> {
        if self.target_step > 0 {
            Some(self.retarget(self.target_step - 1))
        } else {
            None
        }
    }

    /// Set the target step, clamped to `[0, step_count - 1]`.
    ///
    /// Always reports a change, even when the clamped target equals the old one.
    pub fn set_target_step(&mut self, v: i64) -> StepChange {
        let clamped = v.clamp(0, self.last_step() as i64) as usize;
        self.retarget(clamped)
    }

    /// Jump the target to step 0.
    pub fn go_to_first(&mut self) -> StepChange {
        self.retarget(0)
    }

    /// Jump the target to the last step.
    pub fn go_to_last(&mut self) -> StepChange {
        self.retarget(self.last_step())
    }

    /// Set the interpolated step, clamped to `[0, step_count - 1]`.
    pub fn set_interpolated_step(&mut self, v: f64) {
        let v = if v.is_nan() { 0.0 } else { v };
        self.interpolated_step = v.clamp(0.0, self.last_step() as f64);
    }

    /// Ease the interpolated step toward the target: `lerp(interp, target, dt * rate)`.
    pub fn ease_toward_target(&mut self, dt: f64, rate: f64) {
        let eased = lerp(&self.interpolated_step, &(self.target_step as f64), dt * rate);
        self.set_interpolated_step(eased);
    }

    fn retarget(&mut self, new: usize) -> StepChange {
        let change = StepChange {
            old: self.target_step,
            new,
        };
        self.target_step = new;
        tracing::debug!(old = change.old, new = change.new, "target step changed");
        change
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clock.rs"]
mod tests;
