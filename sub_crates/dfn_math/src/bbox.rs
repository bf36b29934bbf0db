#![allow(dead_code)]

use std::ops::{BitOr, BitOrAssign};

use super::Point;

/// A 3D axis-aligned bounding box.
#[derive(Debug, Copy, Clone)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    /// Creates a degenerate BBox with +infinity min and -infinity max.
    pub fn new() -> BBox {
        BBox {
            min: Point::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(min: Point, max: Point) -> BBox {
        BBox { min, max }
    }

    /// Builds a BBox enclosing a set of points. Panics on an empty slice;
    /// callers that may see an empty polygon should check first.
    pub fn from_point_cloud(points: &[Point]) -> BBox {
        let mut b = BBox::new();
        for p in points {
            b |= *p;
        }
        b
    }

    pub fn overlaps(&self, other: &BBox) -> bool {
        self.min.x() <= other.max.x()
            && self.max.x() >= other.min.x()
            && self.min.y() <= other.max.y()
            && self.max.y() >= other.min.y()
            && self.min.z() <= other.max.z()
            && self.max.z() >= other.min.z()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x() + self.max.x()) * 0.5,
            (self.min.y() + self.max.y()) * 0.5,
            (self.min.z() + self.max.z()) * 0.5,
        )
    }

    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }
}

impl Default for BBox {
    fn default() -> BBox {
        BBox::new()
    }
}

/// Union of two `BBox`es.
impl BitOr for BBox {
    type Output = BBox;

    fn bitor(self, rhs: BBox) -> BBox {
        BBox::from_points(self.min.min(rhs.min), self.max.max(rhs.max))
    }
}

impl BitOrAssign for BBox {
    fn bitor_assign(&mut self, rhs: BBox) {
        *self = *self | rhs;
    }
}

/// Expand `BBox` by a point.
impl BitOr<Point> for BBox {
    type Output = BBox;

    fn bitor(self, rhs: Point) -> BBox {
        BBox::from_points(self.min.min(rhs), self.max.max(rhs))
    }
}

impl BitOrAssign<Point> for BBox {
    fn bitor_assign(&mut self, rhs: Point) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlaps_true() {
        let a = BBox::from_points(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
        let b = BBox::from_points(Point::new(0.5, 0.5, 0.5), Point::new(2.0, 2.0, 2.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn overlaps_false() {
        let a = BBox::from_points(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
        let b = BBox::from_points(Point::new(2.0, 2.0, 2.0), Point::new(3.0, 3.0, 3.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn from_point_cloud_and_union() {
        let pts = [
            Point::new(-1.0, 0.0, 0.0),
            Point::new(1.0, 2.0, -3.0),
            Point::new(0.0, -2.0, 3.0),
        ];
        let b = BBox::from_point_cloud(&pts);
        assert_eq!(b.min, Point::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Point::new(1.0, 2.0, 3.0));
    }
}
