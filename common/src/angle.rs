use crate::point::Point;
use std::ops::{Add, Neg, Sub};

/// A facing direction, stored in radians. Bodies report their orientation as
/// an `Angle`; silhouette tests rotate query geometry into the body's local
/// frame with `unrotate`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    pub fn new(radians: f64) -> Self {
        Self { radians }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            radians: degrees.to_radians(),
        }
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    /// Unit vector pointing along this angle.
    pub fn unit(&self) -> Point {
        Point::new(self.radians.cos(), self.radians.sin())
    }

    /// Rotate a local-frame point out into world space.
    pub fn rotate(&self, point: Point) -> Point {
        let (sin, cos) = self.radians.sin_cos();
        Point::new(
            point.x * cos - point.y * sin,
            point.x * sin + point.y * cos,
        )
    }

    /// Rotate a world-space point into the local frame of this facing.
    pub fn unrotate(&self, point: Point) -> Point {
        let (sin, cos) = self.radians.sin_cos();
        Point::new(
            point.x * cos + point.y * sin,
            -point.x * sin + point.y * cos,
        )
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::new(self.radians + other.radians)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.radians - other.radians)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::new(-self.radians)
    }
}
