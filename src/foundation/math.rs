use crate::foundation::core::{Rect, Rgba, Vec2, Vec3};

/// Linear interpolation between two values of the same type.
///
/// Implementations are exact at the endpoints: `t == 0` yields `a` and `t == 1` yields `b`.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` by `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            lerp_f64(a.x, b.x, t),
            lerp_f64(a.y, b.y, t),
            lerp_f64(a.z, b.z, t),
        )
    }
}

impl Lerp for Rgba {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Rgba::new(
            lerp_f64(a.r, b.r, t),
            lerp_f64(a.g, b.g, t),
            lerp_f64(a.b, b.b, t),
            lerp_f64(a.a, b.a, t),
        )
    }
}

#[inline]
fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Shorthand for [`Lerp::lerp`] with the blend factor clamped to `[0, 1]`.
#[inline]
pub fn lerp<T: Lerp>(a: &T, b: &T, t: f64) -> T {
    T::lerp(a, b, clamp01(t))
}

#[inline]
/// Clamp scalar value to normalized range `[0, 1]`.
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Position of `v` between `a` and `b`, clamped to `[0, 1]`. Degenerate ranges map to 0.
pub fn inverse_lerp(a: f64, b: f64, v: f64) -> f64 {
    if a == b {
        0.0
    } else {
        clamp01((v - a) / (b - a))
    }
}

/// Round to the nearest integer, ties to even.
#[inline]
pub fn round_half_even(v: f64) -> f64 {
    v.round_ties_even()
}

/// Strict rectangle overlap: rects that merely share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    b.x1 > a.x0 && b.x0 < a.x1 && b.y1 > a.y0 && b.y0 < a.y1
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn wrap_tau(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
