use std::cell::Cell;

use crate::foundation::math::round_half_even;
use crate::sequencer::script::{ScriptEntry, StateId, StateLibrary, StateScript};
use crate::timeline::clock::TimelineClock;

/// How hold entries are resolved.
///
/// Both modes return identical results; they differ only in cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SequencerMode {
    /// Always scan backward. Use while scrubbing or authoring.
    RandomAccess,
    /// Reuse the last hold resolution while queries move forward.
    #[default]
    MonotonicPlayback,
}

/// Position of one entity's script relative to the clock, shared by every
/// sequencer a composite entity owns so they all read the same snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCursor {
    /// `target_step_proxy - start_index`; may be negative or past the script end.
    pub script_index: isize,
    /// `interpolated_step - target_step_proxy`, in `(-1, 1)`.
    pub crossfade: f64,
    /// Timeline length the neighbour indices are clamped against.
    pub step_count: usize,
}

impl StepCursor {
    /// Derive the cursor for a script starting at `start_index`.
    pub fn from_clock(clock: &TimelineClock, start_index: usize) -> Self {
        let interp = clock.interpolated_step();
        let target = clock.target_step() as f64;
        // Anchors transitions whether playback runs forward, backward or is paused mid-way.
        let proxy = interp.floor().max(interp.ceil().min(target));
        Self {
            script_index: proxy as isize - start_index as isize,
            crossfade: interp - proxy,
            step_count: clock.step_count(),
        }
    }

    /// Whether the bracket is `(previous, current)` rather than `(current, next)`.
    pub fn is_backward(self) -> bool {
        self.crossfade < 0.0
    }

    /// Blend factor inside the bracket, in `[0, 1]`.
    pub fn progress(self) -> f64 {
        if self.is_backward() {
            self.crossfade + 1.0
        } else {
            self.crossfade
        }
    }
}

/// The two keyframe states surrounding the current timeline position.
#[derive(Debug)]
pub struct Bracket<'a, S> {
    /// Earlier state.
    pub a: Option<&'a S>,
    /// Later state.
    pub b: Option<&'a S>,
    /// Blend factor from `a` to `b`.
    pub progress: f64,
}

impl<S> Clone for Bracket<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Bracket<'_, S> {}

impl<'a, S> Bracket<'a, S> {
    /// Both states, when both resolved.
    pub fn pair(&self) -> Option<(&'a S, &'a S)> {
        Some((self.a?, self.b?))
    }

    /// The state nearest to the blend position: `a` while `progress` rounds to 0.
    pub fn nearest(&self) -> Option<&'a S> {
        if round_half_even(self.progress) == 0.0 {
            self.a
        } else {
            self.b
        }
    }

    /// Replace the blend factor.
    pub fn with_progress(self, progress: f64) -> Self {
        Self { progress, ..self }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HoldCache {
    last_hold: Option<usize>,
    /// `(index, state)` of the last scanned key; `None` state when the scan found nothing.
    non_hold: Option<(usize, Option<StateId>)>,
}

impl HoldCache {
    fn lookup(self, index: usize) -> Option<Option<StateId>> {
        let last_hold = self.last_hold?;
        if index > last_hold + 1 {
            return None;
        }
        match self.non_hold {
            Some((at, state)) if index >= at => Some(state),
            _ => None,
        }
    }
}

/// Resolves one entity's script of keyframe states against the timeline.
///
/// One generic sequencer serves frames, cameras, passive motion, artwork, captions and
/// instruments alike.
#[derive(Debug)]
pub struct Sequencer<S> {
    library: StateLibrary<S>,
    script: StateScript,
    start_index: usize,
    mode: SequencerMode,
    cache: Cell<HoldCache>,
}

impl<S> Sequencer<S> {
    /// Build a [`Sequencer`] in [`SequencerMode::MonotonicPlayback`] mode.
    pub fn new(library: StateLibrary<S>, script: StateScript, start_index: usize) -> Self {
        Self {
            library,
            script,
            start_index,
            mode: SequencerMode::default(),
            cache: Cell::new(HoldCache::default()),
        }
    }

    /// Builder-style mode selection.
    pub fn with_mode(mut self, mode: SequencerMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Switch resolution mode; drops any cached hold resolution.
    pub fn set_mode(&mut self, mode: SequencerMode) {
        self.mode = mode;
        self.invalidate_cache();
    }

    /// Current resolution mode.
    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    /// Forget the cached hold resolution.
    pub fn invalidate_cache(&self) {
        self.cache.set(HoldCache::default());
    }

    /// The state library.
    pub fn library(&self) -> &StateLibrary<S> {
        &self.library
    }

    /// The step script.
    pub fn script(&self) -> &StateScript {
        &self.script
    }

    /// Timeline step the script's entry 0 is aligned to.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Cursor for this script under `clock`.
    pub fn cursor(&self, clock: &TimelineClock) -> StepCursor {
        StepCursor::from_clock(clock, self.start_index)
    }

    /// Resolve the state in effect at script `index`, following holds backward.
    ///
    /// Out-of-range indices, dangling handles and holds with no earlier key yield `None`.
    pub fn resolve(&self, index: usize) -> Option<&S> {
        self.resolve_id(index).and_then(|id| self.library.get(id))
    }

    fn resolve_id(&self, index: usize) -> Option<StateId> {
        match self.script.get(index)? {
            ScriptEntry::Key(id) if self.library.contains(id) => Some(id),
            ScriptEntry::Key(id) => {
                tracing::trace!(index, ?id, "script references a dangling state handle");
                None
            }
            ScriptEntry::Hold => self.resolve_hold(index),
        }
    }

    fn resolve_hold(&self, index: usize) -> Option<StateId> {
        if self.mode == SequencerMode::RandomAccess {
            return self.scan_back(index).map(|(_, id)| id);
        }

        let mut cache = self.cache.get();
        let resolved = match cache.lookup(index) {
            Some(hit) => hit,
            None => {
                let found = self.scan_back(index);
                cache.non_hold = Some(match found {
                    Some((at, id)) => (at, Some(id)),
                    None => (0, None),
                });
                found.map(|(_, id)| id)
            }
        };
        cache.last_hold = Some(index);
        self.cache.set(cache);
        resolved
    }

    fn scan_back(&self, index: usize) -> Option<(usize, StateId)> {
        tracing::trace!(index, "full backward hold scan");
        (0..index).rev().find_map(|i| match self.script.get(i) {
            Some(ScriptEntry::Key(id)) if self.library.contains(id) => Some((i, id)),
            _ => None,
        })
    }

    fn neighbour(&self, cursor: StepCursor, offset: isize) -> Option<&S> {
        let len = self.script.len() as isize;
        if len == 0 || cursor.script_index < 0 || cursor.script_index > len - 1 {
            return None;
        }
        let last = cursor.step_count.saturating_sub(1) as isize;
        let index = (cursor.script_index + offset).clamp(0, last.max(0));
        self.resolve(index as usize)
    }

    /// State one step before the cursor.
    pub fn previous(&self, cursor: StepCursor) -> Option<&S> {
        self.neighbour(cursor, -1)
    }

    /// State at the cursor.
    pub fn current(&self, cursor: StepCursor) -> Option<&S> {
        self.neighbour(cursor, 0)
    }

    /// State one step after the cursor.
    pub fn next(&self, cursor: StepCursor) -> Option<&S> {
        self.neighbour(cursor, 1)
    }

    /// Resolve the bracketing states and blend factor at `cursor`.
    pub fn bracket(&self, cursor: StepCursor) -> Bracket<'_, S> {
        let (a, b) = if cursor.is_backward() {
            (self.previous(cursor), self.current(cursor))
        } else {
            (self.current(cursor), self.next(cursor))
        };
        Bracket {
            a,
            b,
            progress: cursor.progress(),
        }
    }

    /// Like [`Sequencer::bracket`], but once the cursor runs past the script end both
    /// states hold the last entry's resolved state.
    pub fn bracket_holding_last(&self, cursor: StepCursor) -> Bracket<'_, S> {
        let len = self.script.len();
        if len > 0 && cursor.script_index > len as isize - 1 {
            let last = self.resolve(len - 1);
            return Bracket {
                a: last,
                b: last,
                progress: cursor.progress(),
            };
        }
        self.bracket(cursor)
    }

    /// Resolve the bracket for this script directly from the clock.
    pub fn resolve_bracket(&self, clock: &TimelineClock) -> Bracket<'_, S> {
        self.bracket(self.cursor(clock))
    }

    /// Whether the previous, current and next entries around the cursor are all holds,
    /// so a playback-time update would change nothing.
    pub fn in_hold_run(&self, cursor: StepCursor) -> bool {
        let len = self.script.len() as isize;
        let i = cursor.script_index;
        if i <= 0 || i >= len - 1 {
            return false;
        }
        let i = i as usize;
        self.script.is_hold(i - 1) && self.script.is_hold(i) && self.script.is_hold(i + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/resolve.rs"]
mod tests;
