use super::*;
use crate::sequencer::script::HOLD_LABEL;

fn sequencer(labels: &[&str], mode: SequencerMode) -> Sequencer<&'static str> {
    let mut lib = StateLibrary::new();
    for name in ["Key0", "Key1", "Key2", "Key3", "Key4", "Key5"] {
        lib.push(name, name);
    }
    let script = StateScript::from_labels(&lib, labels).unwrap();
    Sequencer::new(lib, script, 0).with_mode(mode)
}

fn clock(step_count: usize, target: usize, interp: f64) -> TimelineClock {
    TimelineClock::at(step_count, target, interp).unwrap()
}

/// SplitMix64, enough to drive query orders deterministically.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

#[test]
fn hold_resolves_to_nearest_earlier_key() {
    for mode in [SequencerMode::RandomAccess, SequencerMode::MonotonicPlayback] {
        let seq = sequencer(&["Key0", "Hold", "Hold", "Key3", "Hold"], mode);
        assert_eq!(seq.resolve(0), Some(&"Key0"));
        assert_eq!(seq.resolve(1), Some(&"Key0"));
        assert_eq!(seq.resolve(2), Some(&"Key0"));
        assert_eq!(seq.resolve(3), Some(&"Key3"));
        assert_eq!(seq.resolve(4), Some(&"Key3"));
        assert_eq!(seq.resolve(5), None);
    }
}

#[test]
fn leading_hold_resolves_to_none() {
    let seq = sequencer(&["Hold", "Hold", "Key2"], SequencerMode::MonotonicPlayback);
    assert_eq!(seq.resolve(0), None);
    assert_eq!(seq.resolve(1), None);
    assert_eq!(seq.resolve(2), Some(&"Key2"));
}

#[test]
fn dangling_handles_are_skipped_silently() {
    let mut lib = StateLibrary::new();
    let k0 = lib.push("Key0", "Key0");
    let script = StateScript::new(vec![
        ScriptEntry::Key(k0),
        ScriptEntry::Key(StateId(42)),
        ScriptEntry::Hold,
    ]);
    let seq = Sequencer::new(lib, script, 0);
    assert_eq!(seq.resolve(1), None);
    assert_eq!(seq.resolve(2), Some(&"Key0"));
}

#[test]
fn mid_transition_bracket_uses_previous_and_current() {
    let seq = sequencer(
        &["Key0", "Key1", "Key2", "Hold", "Key4"],
        SequencerMode::MonotonicPlayback,
    );
    let c = clock(5, 2, 1.5);
    let cursor = seq.cursor(&c);
    assert_eq!(cursor.script_index, 2);
    assert_eq!(cursor.crossfade, -0.5);

    let bracket = seq.resolve_bracket(&c);
    assert_eq!(bracket.a, Some(&"Key1"));
    assert_eq!(bracket.b, Some(&"Key2"));
    assert_eq!(bracket.progress, 0.5);
}

#[test]
fn forward_transition_brackets_current_and_next() {
    let seq = sequencer(
        &["Key0", "Key1", "Key2", "Hold", "Key4"],
        SequencerMode::MonotonicPlayback,
    );
    // Target moved back to 1 while the interpolated step still trails above it.
    let bracket = seq.resolve_bracket(&clock(5, 1, 1.25));
    assert_eq!(bracket.a, Some(&"Key1"));
    assert_eq!(bracket.b, Some(&"Key2"));
    assert_eq!(bracket.progress, 0.25);

    let settled = seq.resolve_bracket(&clock(5, 3, 3.0));
    assert_eq!(settled.a, Some(&"Key2"));
    assert_eq!(settled.b, Some(&"Key4"));
    assert_eq!(settled.progress, 0.0);
}

#[test]
fn next_is_clamped_to_the_timeline() {
    let seq = sequencer(&["Key0", "Key1", "Key2"], SequencerMode::RandomAccess);
    let bracket = seq.resolve_bracket(&clock(3, 2, 2.0));
    assert_eq!(bracket.a, Some(&"Key2"));
    assert_eq!(bracket.b, Some(&"Key2"));
}

#[test]
fn start_index_offsets_the_script() {
    let mut lib = StateLibrary::new();
    let a = lib.push("a", "a");
    let b = lib.push("b", "b");
    let script = StateScript::new(vec![ScriptEntry::Key(a), ScriptEntry::Key(b)]);
    let seq = Sequencer::new(lib, script, 3);

    let before = seq.resolve_bracket(&clock(10, 1, 1.0));
    assert!(before.pair().is_none());

    let inside = seq.resolve_bracket(&clock(10, 3, 3.5));
    assert_eq!(inside.pair(), Some((&"a", &"b")));
    assert_eq!(inside.progress, 0.5);
}

#[test]
fn past_the_end_holds_the_last_state() {
    let seq = sequencer(&["Key0", "Key1"], SequencerMode::MonotonicPlayback);
    let c = clock(6, 4, 4.0);
    let cursor = seq.cursor(&c);
    assert!(seq.bracket(cursor).pair().is_none());

    let held = seq.bracket_holding_last(cursor);
    assert_eq!(held.a, Some(&"Key1"));
    assert_eq!(held.b, Some(&"Key1"));
}

#[test]
fn nearest_state_rounds_half_to_a() {
    let seq = sequencer(&["Key0", "Key1"], SequencerMode::RandomAccess);
    let bracket = seq.resolve_bracket(&clock(2, 0, 0.5));
    assert_eq!(bracket.nearest(), Some(&"Key0"));
    assert_eq!(bracket.with_progress(0.6).nearest(), Some(&"Key1"));
}

#[test]
fn hold_run_detection() {
    let seq = sequencer(
        &["Key0", "Hold", "Hold", "Hold", "Key4"],
        SequencerMode::MonotonicPlayback,
    );
    let at = |i: usize| seq.cursor(&clock(5, i, i as f64));
    assert!(!seq.in_hold_run(at(1)));
    assert!(seq.in_hold_run(at(2)));
    assert!(!seq.in_hold_run(at(3)));
    assert!(!seq.in_hold_run(at(0)));
}

#[test]
fn cached_resolution_matches_full_scan_for_any_query_order() {
    let mut rng = Rng(0x5EED);
    for _ in 0..64 {
        let len = 1 + rng.below(24) as usize;
        let labels: Vec<&str> = (0..len)
            .map(|_| match rng.below(6) {
                0 => "Key0",
                1 => "Key1",
                2 => "Key2",
                _ => HOLD_LABEL,
            })
            .collect();
        let cached = sequencer(&labels, SequencerMode::MonotonicPlayback);
        let scanned = sequencer(&labels, SequencerMode::RandomAccess);

        for q in 0..256 {
            let index = match q % 4 {
                // mixes forward playback, repeats, jumps and scrubbing back
                0 | 1 => (q / 4) % (len + 2),
                2 => rng.below(len as u64 + 2) as usize,
                _ => len.saturating_sub(1 + (q / 4) % (len + 1)),
            };
            assert_eq!(
                cached.resolve(index),
                scanned.resolve(index),
                "script {labels:?} index {index}"
            );
        }
    }
}

#[test]
fn progress_stays_in_unit_range() {
    let seq = sequencer(&["Key0", "Hold", "Key2", "Key3"], SequencerMode::MonotonicPlayback);
    for target in 0..4usize {
        for tenth in 0..=30 {
            let c = clock(4, target, f64::from(tenth) * 0.1);
            let p = seq.resolve_bracket(&c).progress;
            assert!((0.0..=1.0).contains(&p), "target {target} interp {tenth} -> {p}");
        }
    }
}

#[test]
fn keyed_first_entry_always_resolves() {
    let mut rng = Rng(7);
    for _ in 0..32 {
        let len = 1 + rng.below(10) as usize;
        let mut labels = vec!["Key1"];
        labels.extend((1..len).map(|_| if rng.below(2) == 0 { "Hold" } else { "Key2" }));
        let seq = sequencer(&labels, SequencerMode::MonotonicPlayback);
        assert!(seq.resolve(0).is_some());
        for i in 0..len {
            assert!(seq.resolve(i).is_some());
        }
    }
}
