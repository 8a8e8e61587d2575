//! Horizontal shear for italic (oblique) variants.

use kurbo::{Affine, Point, Vec2};

use crate::{Error, Result};

/// Steeper slants are almost certainly a typo for radians or a sign mix-up.
const MAX_ANGLE_DEGREES: f64 = 80.0;

/// Shear `x' = x + (y - origin_y) * tan(angle)`.
///
/// Positive angles lean glyphs to the right, the way italics do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skew {
    angle: f64,
    tan: f64,
    origin_y: f64,
}

impl Skew {
    pub fn from_degrees(angle: f64, origin_y: f64) -> Result<Self> {
        if !angle.is_finite() || angle.abs() > MAX_ANGLE_DEGREES {
            return Err(Error::InvalidAngle(angle));
        }
        Ok(Self { angle, tan: angle.to_radians().tan(), origin_y })
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn tan(&self) -> f64 {
        self.tan
    }

    pub fn affine(&self) -> Affine {
        Affine::translate((-self.tan * self.origin_y, 0.0)) * Affine::skew(self.tan, 0.0)
    }

    pub fn apply(&self, p: Point) -> Point {
        self.affine() * p
    }

    /// Shear a relative offset, such as a composite component's anchor.
    ///
    /// Offsets are differences of points, so the origin cancels out.
    pub fn apply_offset(&self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x + offset.y * self.tan, offset.y)
    }
}
