//! Speech-balloon outline: a rounded rectangle traced by angle, with a tail wedge
//! spliced in.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::wrap_tau;

/// Default number of outline samples around the balloon.
pub const DEFAULT_SEGMENTS: usize = 360;
/// Narrowest tail half-width, in degrees.
const MIN_TAIL_HALF_WIDTH_DEG: f64 = 0.01;

/// Rounded-rectangle balloon body, centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BalloonShape {
    /// Half width and half height.
    pub half_extents: Vec2,
    /// Corner radius as a share of the longer half extent.
    pub corner_rounding: f64,
    /// Samples around the outline; rounded down to a multiple of four.
    pub segments: usize,
}

/// Tail wedge attached to a balloon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tail {
    /// Direction from the balloon centre to the tip, radians.
    pub angle: f64,
    /// Half the wedge's angular width, radians.
    pub half_width: f64,
    /// Tip position relative to the balloon centre.
    pub tip: Point,
}

impl Tail {
    /// Tail from a caption's authored width in degrees; the wedge spans a quarter of it
    /// on each side of `angle`.
    pub fn from_width_degrees(angle: f64, tail_width: f64, tip: Point) -> Self {
        Self {
            angle,
            half_width: (tail_width * 0.25).max(MIN_TAIL_HALF_WIDTH_DEG).to_radians(),
            tip,
        }
    }
}

/// One vertex of the outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlinePoint {
    /// Position relative to the balloon centre.
    pub point: Point,
    /// Angle of `point` around the centre, in `[0, 2π)`.
    pub angle: f64,
    /// Whether this vertex is the tail tip.
    pub is_tip: bool,
}

impl BalloonShape {
    /// Build a [`BalloonShape`] with [`DEFAULT_SEGMENTS`] samples.
    pub fn new(half_extents: Vec2, corner_rounding: f64) -> Self {
        Self {
            half_extents,
            corner_rounding,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Corner radii `(horizontal, vertical)`. The longer side drives the radius and the
    /// shorter one caps it.
    pub fn corner_radii(&self) -> (f64, f64) {
        let Vec2 { x: hw, y: hh } = self.half_extents;
        if hw > hh {
            let rh = hw * self.corner_rounding;
            (rh, hh.min(rh))
        } else {
            let rv = hh * self.corner_rounding;
            (hw.min(rv), rv)
        }
    }

    /// Rounded-rectangle outline, counter-clockwise from angle 0, without a tail.
    pub fn outline(&self) -> Vec<OutlinePoint> {
        let segments = (self.segments / 4).max(1) * 4;
        let quarter = segments / 4;
        let (rh, rv) = self.corner_radii();
        let Vec2 { x: hw, y: hh } = self.half_extents;
        let (cx, cy) = ((hw - rh).max(0.0), (hh - rv).max(0.0));
        let centers = [
            Vec2::new(cx, cy),
            Vec2::new(-cx, cy),
            Vec2::new(-cx, -cy),
            Vec2::new(cx, -cy),
        ];
        let step = TAU / segments as f64;

        (0..segments)
            .map(|i| {
                let theta = i as f64 * step;
                let corner = centers[(i / quarter) % 4];
                let point = Point::new(corner.x + rh * theta.cos(), corner.y + rv * theta.sin());
                OutlinePoint {
                    point,
                    angle: wrap_tau(point.y.atan2(point.x)),
                    is_tip: false,
                }
            })
            .collect()
    }

    /// Outline with `tail` spliced in: samples inside the wedge are dropped, the wedge
    /// edges meet the body where their rays cross it, and the result is sorted by angle.
    pub fn outline_with_tail(&self, tail: &Tail) -> Vec<OutlinePoint> {
        let body = self.outline();
        let direction = wrap_tau(tail.angle);

        let mut points: Vec<OutlinePoint> = body
            .iter()
            .copied()
            .filter(|p| angular_distance(p.angle, direction) >= tail.half_width)
            .collect();

        for edge in [direction - tail.half_width, direction + tail.half_width] {
            if let Some(point) = ray_hit(&body, edge) {
                points.push(OutlinePoint {
                    point,
                    angle: wrap_tau(edge),
                    is_tip: false,
                });
            }
        }
        points.push(OutlinePoint {
            point: tail.tip,
            angle: direction,
            is_tip: true,
        });

        points.sort_by(|a, b| a.angle.total_cmp(&b.angle));
        points
    }
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % TAU;
    if d > PI { TAU - d } else { d }
}

/// Nearest crossing of the ray from the origin at `angle` with the closed polyline.
fn ray_hit(body: &[OutlinePoint], angle: f64) -> Option<Point> {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let mut best: Option<f64> = None;
    for (i, p) in body.iter().enumerate() {
        let q = body[(i + 1) % body.len()];
        let (p, q) = (p.point.to_vec2(), q.point.to_vec2());
        let edge = q - p;
        let denom = dir.cross(edge);
        if denom.abs() < f64::EPSILON {
            continue;
        }
        // Solve dir * t = p + edge * s.
        let t = p.cross(edge) / denom;
        let s = p.cross(dir) / denom;
        if t > 0.0 && (0.0..=1.0).contains(&s) && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    }
    best.map(|t| (dir * t).to_point())
}

/// Tail direction for a caption's rotation in degrees; zero rotation points down.
pub fn tail_angle(tail_rotation_deg: f64) -> f64 {
    wrap_tau(tail_rotation_deg.to_radians() - FRAC_PI_2)
}

#[cfg(test)]
#[path = "../../tests/unit/entity/balloon.rs"]
mod tests;
