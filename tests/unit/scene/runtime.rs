use super::*;
use crate::entity::audio::MemorySink;
use crate::foundation::core::Rect;

const SCENE: &str = r#"{
  "step_count": 3,
  "viewport": { "device_size": { "width": 1000, "height": 800 } },
  "panels": [
    {
      "name": "wide",
      "frames": {
        "states": [{ "label": "Full" }, { "label": "Half", "width": 50, "height": 50 }],
        "script": ["Full", "Half", "Hold"]
      },
      "cameras": { "states": [{ "label": "Cam", "position": [0, 0, -10] }], "script": ["Cam"] }
    },
    { "name": "inset" }
  ],
  "artworks": [
    {
      "name": "tree",
      "options": { "panel": "wide" },
      "states": [{ "label": "A", "position": [0, 0, 5] }],
      "script": ["A"]
    }
  ],
  "captions": [
    { "name": "hello", "panel": "wide", "states": [{ "label": "A", "text": "Hi" }], "script": ["A"] }
  ],
  "instruments": [
    {
      "name": "rain",
      "options": { "clip": "rain.ogg", "does_loop": true },
      "states": [{ "label": "On", "volume": 0.8 }],
      "script": ["On"]
    }
  ],
  "triggers": [{ "target": "tree", "trigger_name": "wave", "timeline_step": 1 }]
}"#;

fn scene() -> Scene {
    let scene = Scene::from_reader(SCENE.as_bytes()).unwrap();
    scene.validate().unwrap();
    scene
}

fn xywh(r: Rect) -> (f64, f64, f64, f64) {
    (r.x0, r.y0, r.width(), r.height())
}

#[test]
fn loads_entities_and_spaces_home_positions() {
    let s = scene();
    assert_eq!(s.clock().step_count(), 3);
    assert_eq!(s.panels().len(), 2);
    assert_eq!(s.panels()[0].options().home_position, Vec3::new(50.0, 0.0, 0.0));
    assert_eq!(s.panels()[1].options().home_position, Vec3::new(100.0, 0.0, 0.0));
    assert_eq!(s.artworks().len(), 1);
    assert_eq!(s.captions()[0].panel(), Some("wide"));
    assert_eq!(s.instruments()[0].options().clip.as_deref(), Some("rain.ogg"));
    assert_eq!(s.mode(), SequencerMode::MonotonicPlayback);
}

#[test]
fn explicit_home_positions_are_kept() {
    let json = r#"{ "panels": [
        { "name": "a", "options": { "home_position": [200, 0, 0] } },
        { "name": "b" }
    ] }"#;
    let s = Scene::from_reader(json.as_bytes()).unwrap();
    assert_eq!(s.panels()[0].options().home_position.x, 200.0);
    assert_eq!(s.panels()[1].options().home_position.x, 250.0);
}

#[test]
fn tick_links_entities_to_their_panel() {
    let mut s = scene();
    let frame = s.tick(InputAxes::default(), 0.0);
    assert_eq!(frame.target_step, 0);
    assert_eq!(xywh(frame.panels[0].frame_rect), (0.0, 0.0, 1000.0, 800.0));
    assert_eq!(frame.panels[1].frame_rect, Rect::ZERO);

    let camera = frame.panels[0].camera.unwrap();
    assert_eq!(camera.position, Vec3::new(50.0, 0.0, -10.0));

    let art = frame.artworks[0].unwrap();
    assert_eq!(art.position, Vec3::new(50.0, 0.0, 5.0));

    let caption = frame.captions[0].as_ref().unwrap();
    assert_eq!(caption.text, "Hi");
}

#[test]
fn navigation_fires_triggers_and_easing_blends_frames() {
    let mut s = scene();
    let (change, fired) = s.navigate(Navigation::Next).unwrap();
    assert_eq!((change.old, change.new), (0, 1));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].trigger_name, "wave");

    s.advance(0.1);
    assert_eq!(s.clock().interpolated_step(), 0.5);
    let frame = s.tick(InputAxes::default(), 0.1);
    assert_eq!(xywh(frame.panels[0].frame_rect), (125.0, 100.0, 750.0, 600.0));

    let (change, fired) = s.navigate(Navigation::Previous).unwrap();
    assert_eq!((change.old, change.new), (1, 0));
    assert!(fired.is_empty());
    assert!(s.navigate(Navigation::Previous).is_none());

    let (change, _) = s.navigate(Navigation::To(99)).unwrap();
    assert_eq!(change.new, 2);
    let (change, _) = s.navigate(Navigation::First).unwrap();
    assert_eq!(change.new, 0);
}

#[test]
fn audio_ticks_drive_the_sink() {
    let mut s = scene();
    let mut sink = MemorySink::new();
    assert_eq!(s.tick_audio(0.1, &mut sink), vec![Some(0.0)]);
    let volumes = s.tick_audio(0.1, &mut sink);
    assert!((volumes[0].unwrap() - 0.16).abs() < 1e-12);
    assert!(sink.voices()[0].looping);
}

#[test]
fn mode_switch_reaches_every_sequencer() {
    let mut s = scene();
    s.set_mode(SequencerMode::RandomAccess);
    assert_eq!(s.panels()[0].frames().mode(), SequencerMode::RandomAccess);
    assert_eq!(s.artworks()[0].states().mode(), SequencerMode::RandomAccess);
    assert_eq!(s.instruments()[0].states().mode(), SequencerMode::RandomAccess);
}

#[test]
fn defaults_apply_to_an_empty_scene() {
    let s = Scene::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(s.clock().step_count(), 30);
    assert!(s.viewport().is_none());
    s.validate().unwrap();

    let s = Scene::from_reader(r#"{ "step_count": 4, "entry": "Backward" }"#.as_bytes()).unwrap();
    assert_eq!(s.clock().target_step(), 3);
}

#[test]
fn load_errors_are_classified() {
    let err = Scene::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, PanoplyError::Serde(_)));

    let unknown_label = r#"{ "panels": [{ "name": "p", "frames": { "states": [], "script": ["Nope"] } }] }"#;
    let err = Scene::from_reader(unknown_label.as_bytes()).unwrap_err();
    assert!(matches!(err, PanoplyError::Validation(ref m) if m.contains("Nope")));

    let unknown_panel = r#"{ "captions": [{ "name": "c", "panel": "ghost" }] }"#;
    let err = Scene::from_reader(unknown_panel.as_bytes()).unwrap_err();
    assert!(matches!(err, PanoplyError::Validation(ref m) if m.contains("ghost")));

    let zero_steps = r#"{ "step_count": 0 }"#;
    assert!(Scene::from_reader(zero_steps.as_bytes()).is_err());

    let err = Scene::from_path("does/not/exist.json").unwrap_err();
    assert!(matches!(err, PanoplyError::Validation(_)));
}

#[test]
fn validate_rejects_inconsistent_scenes() {
    let dupes = r#"{ "panels": [{ "name": "p" }, { "name": "p" }] }"#;
    let s = Scene::from_reader(dupes.as_bytes()).unwrap();
    assert!(s.validate().is_err());

    let late = r#"{ "step_count": 2, "triggers": [{ "target": "a", "trigger_name": "go", "timeline_step": 2 }] }"#;
    let s = Scene::from_reader(late.as_bytes()).unwrap();
    assert!(s.validate().is_err());

    let bad_viewport = r#"{ "viewport": { "device_size": { "width": 0, "height": 10 } } }"#;
    let s = Scene::from_reader(bad_viewport.as_bytes()).unwrap();
    assert!(s.validate().is_err());
}
