#![allow(dead_code)]

use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::DVec3;

use super::{CrossProduct, DotProduct, Normal, Point};

/// A direction vector in 3d space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector {
    pub co: DVec3,
}

impl Vector {
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Vector {
        Vector {
            co: DVec3::new(x, y, z),
        }
    }

    #[inline(always)]
    pub fn zero() -> Vector {
        Vector::new(0.0, 0.0, 0.0)
    }

    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.co.length()
    }

    #[inline(always)]
    pub fn length2(&self) -> f64 {
        self.co.length_squared()
    }

    #[inline(always)]
    pub fn normalized(&self) -> Vector {
        Vector {
            co: self.co.normalize(),
        }
    }

    #[inline(always)]
    pub fn into_point(self) -> Point {
        Point { co: self.co }
    }

    #[inline(always)]
    pub fn into_normal(self) -> Normal {
        Normal { co: self.co }
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
}

impl Add for Vector {
    type Output = Vector;

    #[inline(always)]
    fn add(self, other: Vector) -> Vector {
        Vector {
            co: self.co + other.co,
        }
    }
}

impl Sub for Vector {
    type Output = Vector;

    #[inline(always)]
    fn sub(self, other: Vector) -> Vector {
        Vector {
            co: self.co - other.co,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    #[inline(always)]
    fn mul(self, other: f64) -> Vector {
        Vector {
            co: self.co * other,
        }
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    #[inline(always)]
    fn div(self, other: f64) -> Vector {
        Vector {
            co: self.co / other,
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline(always)]
    fn neg(self) -> Vector {
        Vector { co: -self.co }
    }
}

impl DotProduct for Vector {
    #[inline(always)]
    fn dot(self, other: Vector) -> f64 {
        self.co.dot(other.co)
    }
}

impl CrossProduct for Vector {
    #[inline]
    fn cross(self, other: Vector) -> Vector {
        Vector {
            co: self.co.cross(other.co),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CrossProduct, DotProduct};
    use super::*;

    #[test]
    fn add() {
        let v1 = Vector::new(1.0, 2.0, 3.0);
        let v2 = Vector::new(1.5, 4.5, 2.5);
        let v3 = Vector::new(2.5, 6.5, 5.5);

        assert_eq!(v3, v1 + v2);
    }

    #[test]
    fn sub() {
        let v1 = Vector::new(1.0, 2.0, 3.0);
        let v2 = Vector::new(1.5, 4.5, 2.5);
        let v3 = Vector::new(-0.5, -2.5, 0.5);

        assert_eq!(v3, v1 - v2);
    }

    #[test]
    fn length() {
        let v = Vector::new(1.0, 2.0, 3.0);
        assert!((v.length() - 3.7416573867739413).abs() < 0.000_001);
    }

    #[test]
    fn dot_test() {
        let v1 = Vector::new(1.0, 2.0, 3.0);
        let v2 = Vector::new(1.5, 4.5, 2.5);
        assert_eq!(18.0, v1.dot(v2));
    }

    #[test]
    fn cross_test() {
        let v1 = Vector::new(1.0, 0.0, 0.0);
        let v2 = Vector::new(0.0, 1.0, 0.0);
        let v3 = Vector::new(0.0, 0.0, 1.0);
        assert_eq!(v3, v1.cross(v2));
    }
}
