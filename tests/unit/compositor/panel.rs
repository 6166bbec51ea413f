use super::*;
use crate::compositor::passive::PassiveMotionState;
use crate::layout::frame::PanelPosition;
use crate::sequencer::script::{StateLibrary, StateScript};
use crate::timeline::clock::TimelineClock;
use crate::timeline::tick::InputAxes;

fn sequencer<S>(states: Vec<S>, script: &[&str]) -> Sequencer<S> {
    let mut lib = StateLibrary::new();
    for (i, s) in states.into_iter().enumerate() {
        lib.push(format!("Key{i}"), s);
    }
    let script = StateScript::from_labels(&lib, script).unwrap();
    Sequencer::new(lib, script, 0)
}

fn half_frame() -> FrameState {
    let mut f = FrameState::default();
    f.set_size("50%", "50%", "", "").unwrap();
    f
}

fn panel(frames: Vec<FrameState>, script: &[&str], options: PanelOptions) -> Panel {
    let cameras = vec![CameraState::default(); frames.len()];
    let passive = vec![PassiveMotionState::default(); frames.len()];
    Panel::new(
        "panel",
        sequencer(frames, script),
        sequencer(cameras, script),
        sequencer(passive.clone(), script),
        sequencer(passive, &[]),
        options,
    )
}

fn xywh(r: Rect) -> (f64, f64, f64, f64) {
    (r.x0, r.y0, r.width(), r.height())
}

#[test]
fn frame_rect_blends_origin_and_size() {
    let mut p = panel(
        vec![FrameState::default(), half_frame()],
        &["Key0", "Key1"],
        PanelOptions::default(),
    );
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::at(2, 1, 0.5).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));

    assert_eq!(out.progress, 0.5);
    assert_eq!(xywh(out.frame_rect), (125.0, 100.0, 750.0, 600.0));
    assert_eq!(xywh(out.marginless_rect), (125.0, 100.0, 750.0, 600.0));
    assert!(out.camera_enabled);

    let pose = out.camera.unwrap();
    assert_eq!(pose.position, Vec3::ZERO);
    assert!(pose.field_of_view > 0.0 && pose.field_of_view <= 180.0);
}

#[test]
fn settled_steps_reproduce_the_keyframe_exactly() {
    let mut p = panel(
        vec![FrameState::default(), half_frame()],
        &["Key0", "Key1"],
        PanelOptions::default(),
    );
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::at(2, 1, 1.0).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert_eq!(out.progress, 0.0);
    assert_eq!(xywh(out.frame_rect), (250.0, 200.0, 500.0, 400.0));
}

#[test]
fn offscreen_rect_takes_its_partner_size() {
    let screen = rect_xywh(0.0, 0.0, 1000.0, 800.0);
    let gone = rect_xywh(-1000.0, 0.0, 1000.0, 800.0);
    let partner = rect_xywh(250.0, 200.0, 500.0, 400.0);
    let frozen = freeze_offscreen(gone, partner, screen);
    assert_eq!(xywh(frozen), (-500.0, 0.0, 500.0, 400.0));

    let below = rect_xywh(100.0, -800.0, 1000.0, 800.0);
    let frozen = freeze_offscreen(below, partner, screen);
    assert_eq!(xywh(frozen), (100.0, -400.0, 500.0, 400.0));

    assert_eq!(freeze_offscreen(partner, gone, screen), partner);
}

#[test]
fn panel_sliding_offscreen_keeps_its_size() {
    let mut gone = FrameState::default();
    gone.move_to(PanelPosition::OffscreenLeft, "0%").unwrap();
    let mut p = panel(vec![gone, half_frame()], &["Key0", "Key1"], PanelOptions::default());
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::at(2, 1, 0.5).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert_eq!(xywh(out.frame_rect), (-125.0, 100.0, 500.0, 400.0));
}

#[test]
fn missing_frame_states_blank_the_panel() {
    let mut p = panel(vec![FrameState::default()], &[], PanelOptions::default());
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::new(3).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert_eq!(out.frame_rect, Rect::ZERO);
    assert!(!out.camera_enabled);
    assert_eq!(out.border_size, 0.0);
    assert_eq!(out.border_color, Rgba::BLACK);
    assert_eq!(out.matte_color.r, 0.001);
    assert!(out.camera.is_none());
}

#[test]
fn opaque_black_matte_is_nudged() {
    let mut f = FrameState::default();
    f.matte_color = Rgba::BLACK;
    f.border_size = 4.0;
    let mut p = panel(vec![f], &["Key0"], PanelOptions::default());
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::new(1).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert_eq!(out.matte_color, Rgba::new(0.001, 0.0, 0.0, 1.0));
    assert_eq!(out.border_size, 4.0);
}

#[test]
fn disabling_next_interpolation_snaps_forward() {
    let options = PanelOptions {
        interpolate_next: false,
        ..PanelOptions::default()
    };
    let mut p = panel(vec![FrameState::default(), half_frame()], &["Key0", "Key1"], options);
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::at(2, 0, 0.25).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert_eq!(out.progress, 1.0);
    assert_eq!(xywh(out.frame_rect), (250.0, 200.0, 500.0, 400.0));
}

#[test]
fn passive_motion_feeds_the_camera_translation() {
    let mut p = panel(vec![FrameState::default()], &["Key0"], PanelOptions::default());
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::new(1).unwrap();
    let ctx = TickContext::new(&clock)
        .with_viewport(&vp)
        .with_axes(InputAxes::new(1.0, 0.0))
        .with_dt(0.1);
    let out = p.update(&ctx);
    assert_eq!(out.passive_h.translation.x, 1.0);
    assert_eq!(out.passive_v, MotionOffset::default());
    assert_eq!(out.camera.unwrap().local_translation, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn last_pose_is_reused_when_the_renderer_disappears() {
    let mut p = panel(vec![FrameState::default()], &["Key0"], PanelOptions::default());
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::new(1).unwrap();
    let first = p.update(&TickContext::new(&clock).with_viewport(&vp)).camera;
    assert!(first.is_some());

    let blind = p.update(&TickContext::new(&clock));
    assert_eq!(blind.camera, first);
    assert!(!blind.camera_enabled);
}

#[test]
fn camera_control_can_be_disabled() {
    let options = PanelOptions {
        disable_camera_control: true,
        ..PanelOptions::default()
    };
    let mut p = panel(vec![FrameState::default()], &["Key0"], options);
    let vp = Viewport::new(1000.0, 800.0);
    let clock = TimelineClock::new(1).unwrap();
    let out = p.update(&TickContext::new(&clock).with_viewport(&vp));
    assert!(out.camera.is_none());
    assert!(out.camera_enabled);
}

#[test]
fn options_deserialize_with_defaults() {
    let o: PanelOptions = serde_json::from_str(r#"{"preserve_framing":true}"#).unwrap();
    assert!(o.preserve_framing);
    assert_eq!(o.framing_distance, 5.0);
    assert!(o.interpolate_previous && o.interpolate_next);
}
