use super::*;

#[test]
fn zero_step_timeline_is_rejected() {
    assert!(TimelineClock::new(0).is_err());
}

#[test]
fn increment_and_decrement_stop_at_the_ends() {
    let mut clock = TimelineClock::new(3).unwrap();
    assert_eq!(clock.decrement_step(), None);
    assert_eq!(clock.increment_step(), Some(StepChange { old: 0, new: 1 }));
    assert_eq!(clock.increment_step(), Some(StepChange { old: 1, new: 2 }));
    assert_eq!(clock.increment_step(), None);
    assert_eq!(clock.target_step(), 2);
    assert_eq!(clock.decrement_step(), Some(StepChange { old: 2, new: 1 }));
}

#[test]
fn set_target_step_clamps_and_always_notifies() {
    let mut clock = TimelineClock::new(5).unwrap();
    assert_eq!(clock.set_target_step(99), StepChange { old: 0, new: 4 });
    assert_eq!(clock.set_target_step(-3), StepChange { old: 4, new: 0 });
    assert_eq!(clock.set_target_step(0), StepChange { old: 0, new: 0 });
    assert_eq!(clock.go_to_last(), StepChange { old: 0, new: 4 });
    assert_eq!(clock.go_to_first(), StepChange { old: 4, new: 0 });
}

#[test]
fn set_interpolated_step_clamps() {
    let mut clock = TimelineClock::new(5).unwrap();
    clock.set_interpolated_step(7.5);
    assert_eq!(clock.interpolated_step(), 4.0);
    clock.set_interpolated_step(-1.0);
    assert_eq!(clock.interpolated_step(), 0.0);
    clock.set_interpolated_step(2.25);
    assert_eq!(clock.interpolated_step(), 2.25);
}

#[test]
fn backward_entry_starts_at_last_step() {
    let clock = TimelineClock::starting_at(6, SceneEntry::Backward).unwrap();
    assert_eq!(clock.target_step(), 5);
    assert_eq!(clock.interpolated_step(), 5.0);
    assert!(clock.is_settled());
}

#[test]
fn easing_approaches_target_without_overshoot() {
    let mut clock = TimelineClock::new(10).unwrap();
    clock.set_target_step(4);
    clock.ease_toward_target(0.1, DEFAULT_GESTURE_RATE);
    assert!((clock.interpolated_step() - 2.0).abs() < 1e-12);
    for _ in 0..200 {
        clock.ease_toward_target(1.0 / 60.0, DEFAULT_GESTURE_RATE);
        assert!(clock.interpolated_step() <= 4.0 + 1e-9);
    }
    assert!((clock.interpolated_step() - 4.0).abs() < 1e-3);

    clock.ease_toward_target(1.0, DEFAULT_GESTURE_RATE);
    assert_eq!(clock.interpolated_step(), 4.0);
    assert!(clock.is_settled());
}

#[test]
fn direction_of_change() {
    assert_eq!(StepChange { old: 1, new: 2 }.direction(), Direction::Forward);
    assert_eq!(StepChange { old: 2, new: 1 }.direction(), Direction::Backward);
    assert_eq!(StepChange { old: 2, new: 2 }.direction(), Direction::Backward);
}
