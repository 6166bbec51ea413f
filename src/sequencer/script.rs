use crate::foundation::error::{PanoplyError, PanoplyResult};

/// Label that marks a `Hold` entry when scripts are authored as strings.
pub const HOLD_LABEL: &str = "Hold";

/// Opaque handle to a keyframe state inside its owning [`StateLibrary`].
///
/// Handles are assigned when a library is built; display labels are never used for identity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl StateId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One step of a [`StateScript`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScriptEntry {
    /// Keep the value of the nearest earlier keyed step.
    Hold,
    /// Switch to the referenced state.
    Key(StateId),
}

impl ScriptEntry {
    /// Whether this entry is the hold sentinel.
    pub fn is_hold(self) -> bool {
        matches!(self, ScriptEntry::Hold)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A keyframe state plus its display label.
pub struct Labeled<S> {
    /// Display label (metadata only).
    pub label: String,
    /// The state snapshot.
    #[serde(flatten)]
    pub state: S,
}

/// Immutable library of keyframe states owned by one entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StateLibrary<S> {
    states: Vec<Labeled<S>>,
}

impl<S> Default for StateLibrary<S> {
    fn default() -> Self {
        Self { states: Vec::new() }
    }
}

impl<S> StateLibrary<S> {
    /// Build an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state and return its handle.
    pub fn push(&mut self, label: impl Into<String>, state: S) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(Labeled {
            label: label.into(),
            state,
        });
        id
    }

    /// Resolve a handle. Dangling handles yield `None`.
    pub fn get(&self, id: StateId) -> Option<&S> {
        self.states.get(id.index()).map(|s| &s.state)
    }

    /// Whether `id` refers to a state in this library.
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    /// Display label for a handle.
    pub fn label(&self, id: StateId) -> Option<&str> {
        self.states.get(id.index()).map(|s| s.label.as_str())
    }

    /// Handle of the first state with the given label.
    pub fn find(&self, label: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.label == label)
            .map(|i| StateId(i as u32))
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate `(handle, label, state)` in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &str, &S)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s.label.as_str(), &s.state))
    }
}

/// Per-step script of an entity: one [`ScriptEntry`] per timeline step.
///
/// Entry 0 is expected to be a key; the resolver tolerates scripts that break this.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StateScript {
    entries: Vec<ScriptEntry>,
}

impl StateScript {
    /// Build a [`StateScript`] value.
    pub fn new(entries: Vec<ScriptEntry>) -> Self {
        Self { entries }
    }

    /// Build a script from authored labels, mapping `"Hold"` to [`ScriptEntry::Hold`].
    ///
    /// Unknown labels are rejected; handles are only ever assigned here.
    pub fn from_labels<S, L>(library: &StateLibrary<S>, labels: &[L]) -> PanoplyResult<Self>
    where
        L: AsRef<str>,
    {
        let entries = labels
            .iter()
            .enumerate()
            .map(|(step, label)| {
                let label = label.as_ref();
                if label == HOLD_LABEL {
                    return Ok(ScriptEntry::Hold);
                }
                library.find(label).map(ScriptEntry::Key).ok_or_else(|| {
                    PanoplyError::validation(format!(
                        "script step {step} references unknown state '{label}'"
                    ))
                })
            })
            .collect::<PanoplyResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<ScriptEntry> {
        self.entries.get(index).copied()
    }

    /// Whether the entry at `index` exists and is `Hold`.
    pub fn is_hold(&self, index: usize) -> bool {
        self.get(index).is_some_and(ScriptEntry::is_hold)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the script has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in step order.
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/script.rs"]
mod tests;
