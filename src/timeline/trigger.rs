use crate::timeline::clock::{Direction, StepChange};

/// Which step transitions fire an [`AnimationTrigger`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TriggerDirection {
    /// Fire on arrival from either side.
    #[default]
    BothDirections,
    /// Fire only when stepping forward onto the step.
    ForwardOnly,
    /// Fire only when stepping backward (or re-targeting) onto the step.
    BackwardOnly,
}

/// A named animation cue bound to a timeline step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationTrigger {
    /// Name of the animated object the cue is delivered to.
    pub target: String,
    /// Cue name understood by the target.
    pub trigger_name: String,
    /// Step that fires the cue.
    pub timeline_step: usize,
    /// Transition directions that fire the cue.
    #[serde(default)]
    pub direction: TriggerDirection,
}

impl AnimationTrigger {
    /// Whether `change` fires this trigger.
    pub fn fires_on(&self, change: StepChange) -> bool {
        if change.new != self.timeline_step {
            return false;
        }
        match self.direction {
            TriggerDirection::BothDirections => true,
            TriggerDirection::ForwardOnly => change.direction() == Direction::Forward,
            TriggerDirection::BackwardOnly => change.direction() == Direction::Backward,
        }
    }
}

/// Ordered set of triggers listening to step changes.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TriggerTable {
    triggers: Vec<AnimationTrigger>,
}

impl TriggerTable {
    /// Build a [`TriggerTable`] value.
    pub fn new(triggers: Vec<AnimationTrigger>) -> Self {
        Self { triggers }
    }

    /// All triggers, in authoring order.
    pub fn triggers(&self) -> &[AnimationTrigger] {
        &self.triggers
    }

    /// Triggers fired by `change`, in authoring order.
    pub fn fired(&self, change: StepChange) -> impl Iterator<Item = &AnimationTrigger> {
        self.triggers.iter().filter(move |t| {
            let fires = t.fires_on(change);
            if fires {
                tracing::debug!(
                    object = %t.target,
                    trigger = %t.trigger_name,
                    step = change.new,
                    "animation trigger fired"
                );
            }
            fires
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/trigger.rs"]
mod tests;
