#![allow(dead_code)]

use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::DVec3;

use super::{CrossProduct, DotProduct, Vector};

/// A surface normal in 3d space. Kept distinct from `Vector` because the
/// two transform differently (normals need the inverse-transpose under a
/// general linear map); here that only matters for documentation purposes
/// since FRAM never applies non-rigid transforms to normals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Normal {
    pub co: DVec3,
}

impl Normal {
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Normal {
        Normal {
            co: DVec3::new(x, y, z),
        }
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
    pub fn normalized(&self) -> Normal {
        Normal {
            co: self.co.normalize(),
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
}

impl Add for Normal {
    type Output = Normal;

    #[inline(always)]
    fn add(self, other: Normal) -> Normal {
        Normal {
            co: self.co + other.co,
        }
    }
}

impl Sub for Normal {
    type Output = Normal;

    #[inline(always)]
    fn sub(self, other: Normal) -> Normal {
        Normal {
            co: self.co - other.co,
        }
    }
}

impl Mul<f64> for Normal {
    type Output = Normal;

    #[inline(always)]
    fn mul(self, other: f64) -> Normal {
        Normal {
            co: self.co * other,
        }
    }
}

impl Div<f64> for Normal {
    type Output = Normal;

    #[inline(always)]
    fn div(self, other: f64) -> Normal {
        Normal {
            co: self.co / other,
        }
    }
}

impl Neg for Normal {
    type Output = Normal;

    #[inline(always)]
    fn neg(self) -> Normal {
        Normal { co: -self.co }
    }
}

impl DotProduct for Normal {
    #[inline(always)]
    fn dot(self, other: Normal) -> f64 {
        self.co.dot(other.co)
    }
}

impl CrossProduct for Normal {
    #[inline]
    fn cross(self, other: Normal) -> Normal {
        Normal {
            co: self.co.cross(other.co),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CrossProduct, DotProduct};
    use super::*;

    #[test]
    fn normalized() {
        let n1 = Normal::new(1.0, 2.0, 3.0);
        let n2 = n1.normalized();
        assert!((n2.length() - 1.0).abs() < 0.000_001);
    }

    #[test]
    fn dot_test() {
        let v1 = Normal::new(1.0, 2.0, 3.0);
        let v2 = Normal::new(1.5, 4.5, 2.5);
        assert_eq!(18.0, v1.dot(v2));
    }

    #[test]
    fn cross_test() {
        let v1 = Normal::new(1.0, 0.0, 0.0);
        let v2 = Normal::new(0.0, 1.0, 0.0);
        let v3 = Normal::new(0.0, 0.0, 1.0);
        assert_eq!(v3, v1.cross(v2));
    }
}
