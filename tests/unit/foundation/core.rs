use super::*;

#[test]
fn rect_xywh_keeps_bottom_left_origin() {
    let r = rect_xywh(250.0, 200.0, 500.0, 400.0);
    assert_eq!(r.x0, 250.0);
    assert_eq!(r.y0, 200.0);
    assert_eq!(r.width(), 500.0);
    assert_eq!(r.height(), 400.0);
}

#[test]
fn vec3_accepts_array_and_object_json() {
    let a: Vec3 = serde_json::from_str("[1, 2, 3]").unwrap();
    let b: Vec3 = serde_json::from_str(r#"{"x": 1, "y": 2, "z": 3}"#).unwrap();
    assert_eq!(a, b);

    let partial: Vec3 = serde_json::from_str(r#"{"z": -10}"#).unwrap();
    assert_eq!(partial, Vec3::new(0.0, 0.0, -10.0));
}

#[test]
fn rgba_defaults_alpha_to_opaque() {
    let c: Rgba = serde_json::from_str("[0.5, 0.25, 0]").unwrap();
    assert_eq!(c, Rgba::new(0.5, 0.25, 0.0, 1.0));

    let c: Rgba = serde_json::from_str(r#"{"r": 1, "g": 0, "b": 0}"#).unwrap();
    assert_eq!(c.a, 1.0);

    let c: Rgba = serde_json::from_str("[0, 0, 0, 0]").unwrap();
    assert_eq!(c, Rgba::CLEAR);
}

#[test]
fn vec3_arithmetic() {
    let v = Vec3::new(1.0, 2.0, 3.0) + Vec3::ONE * 2.0 - Vec3::splat(1.0);
    assert_eq!(v, Vec3::new(2.0, 3.0, 4.0));
    assert_eq!(-v, Vec3::new(-2.0, -3.0, -4.0));
    assert!(!Vec3::new(f64::NAN, 0.0, 0.0).is_finite());
}
