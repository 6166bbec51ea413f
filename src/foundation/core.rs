use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Build a [`Rect`] from a bottom-left origin and a size.
///
/// Panoply works in y-up screen space, so `y0` is the bottom edge and `y1` the top.
pub fn rect_xywh(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

/// Three-component vector used for camera and artwork transforms (Euler angles in degrees).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// The all-ones vector.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a [`Vec3`] value.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Uniform vector with every component set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<'de> Deserialize<'de> for Vec3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 3]),
            Obj {
                #[serde(default)]
                x: f64,
                #[serde(default)]
                y: f64,
                #[serde(default)]
                z: f64,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, z]) => Ok(Self { x, y, z }),
            Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
        }
    }
}

/// Straight-alpha RGBA colour with unit-range components.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build an [`Rgba`] value.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        fn opaque() -> f64 {
            1.0
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Rgb([f64; 3]),
            Rgba([f64; 4]),
            Obj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "opaque")]
                a: f64,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Rgb([r, g, b]) => Ok(Self::new(r, g, b, 1.0)),
            Repr::Rgba([r, g, b, a]) => Ok(Self::new(r, g, b, a)),
            Repr::Obj { r, g, b, a } => Ok(Self::new(r, g, b, a)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
