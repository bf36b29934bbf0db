#![allow(dead_code)]

use std::ops::{Add, Sub};

use glam::DVec3;

use super::Vector;

/// A position in 3d space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub co: DVec3,
}

impl Point {
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point {
            co: DVec3::new(x, y, z),
        }
    }

    #[inline(always)]
    pub fn min(&self, other: Point) -> Point {
        Point {
            co: self.co.min(other.co),
        }
    }

    #[inline(always)]
    pub fn max(&self, other: Point) -> Point {
        Point {
            co: self.co.max(other.co),
        }
    }

    #[inline(always)]
    pub fn into_vector(self) -> Vector {
        Vector::new(self.co.x, self.co.y, self.co.z)
    }

    #[inline(always)]
    pub fn x(&self) -> f64 {
        self.co.x
    }

    #[inline(always)]
    pub fn y(&self) -> f64 {
        self.co.y
    }

    #[inline(always)]
    pub fn z(&self) -> f64 {
        self.co.z
    }

    #[inline(always)]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    #[inline(always)]
    pub fn distance2(&self, other: Point) -> f64 {
        (*self - other).length2()
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: Vector) -> Point {
        Point {
            co: self.co + other.co,
        }
    }
}

impl Sub for Point {
    type Output = Vector;

    #[inline(always)]
    fn sub(self, other: Point) -> Vector {
        Vector {
            co: self.co - other.co,
        }
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: Vector) -> Point {
        Point {
            co: self.co - other.co,
        }
    }
}
