#![allow(dead_code)]

use super::{cross, dot, Normal, Point, Vector};

/// An (infinite) plane, represented as a point on the plane plus its unit
/// normal.
#[derive(Debug, Copy, Clone)]
pub struct Plane {
    pub point: Point,
    pub normal: Normal,
}

impl Plane {
    pub fn new(point: Point, normal: Normal) -> Plane {
        Plane {
            point,
            normal: normal.normalized(),
        }
    }

    /// Signed distance from `p` to the plane; positive on the side the
    /// normal points towards.
    pub fn signed_distance(&self, p: Point) -> f64 {
        dot(self.normal, (p - self.point).into_normal())
    }

    /// Intersection of the line `p0 + t*dir` with this plane. Returns
    /// `None` when the line is parallel to the plane (within `eps`).
    pub fn line_intersection(&self, p0: Point, dir: Vector, eps: f64) -> Option<Point> {
        let denom = dot(self.normal, dir.into_normal());
        if denom.abs() <= eps {
            return None;
        }
        let t = -self.signed_distance(p0) / denom;
        Some(p0 + (dir * t))
    }
}

/// Line of intersection between two planes: a point on the line and its
/// (unnormalized is fine, but we normalize) direction. Returns `None` if
/// the planes are parallel to within `eps` (`|n1 . n2| > 1 - eps`).
pub fn plane_plane_intersection(a: &Plane, b: &Plane, eps: f64) -> Option<(Point, Vector)> {
    let n1 = a.normal.into_vector();
    let n2 = b.normal.into_vector();

    if dot(n1.normalized(), n2.normalized()).abs() > 1.0 - eps {
        return None;
    }

    let dir = cross(n1, n2);

    // Solve for a point on both planes: find the point closest to the
    // origin of the line system using the standard two-plane formula.
    let d1 = -dot(a.normal, a.point.into_vector().into_normal());
    let d2 = -dot(b.normal, b.point.into_vector().into_normal());

    let n1n1 = dot(n1, n1);
    let n1n2 = dot(n1, n2);
    let n2n2 = dot(n2, n2);
    let det = (n1n1 * n2n2) - (n1n2 * n1n2);
    if det.abs() <= eps {
        return None;
    }
    let c1 = ((-d1 * n2n2) + (d2 * n1n2)) / det;
    let c2 = ((-d2 * n1n1) + (d1 * n1n2)) / det;
    let p = Point::new(0.0, 0.0, 0.0) + (n1 * c1) + (n2 * c2);

    Some((p, dir.normalized()))
}

/// Closest points between two 3D line segments `[a0,a1]` and `[b0,b1]`.
/// Returns `(point_on_a, point_on_b, t_a, t_b)` with `t` the parametric
/// position clamped to `[0,1]` on each segment.
pub fn segment_closest_points(
    a0: Point,
    a1: Point,
    b0: Point,
    b1: Point,
) -> (Point, Point, f64, f64) {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;

    let aa = dot(d1, d1);
    let ee = dot(d2, d2);
    let f = dot(d2, r);

    let (mut s, mut t);
    if aa <= 1e-20 && ee <= 1e-20 {
        s = 0.0;
        t = 0.0;
    } else if aa <= 1e-20 {
        s = 0.0;
        t = (f / ee).clamp(0.0, 1.0);
    } else {
        let c = dot(d1, r);
        if ee <= 1e-20 {
            t = 0.0;
            s = (-c / aa).clamp(0.0, 1.0);
        } else {
            let b = dot(d1, d2);
            let denom = (aa * ee) - (b * b);
            s = if denom.abs() > 1e-20 {
                ((b * f) - (c * ee)) / denom
            } else {
                0.0
            }
            .clamp(0.0, 1.0);
            t = ((b * s) + f) / ee;
            if t < 0.0 {
                t = 0.0;
                s = (-c / aa).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / aa).clamp(0.0, 1.0);
            }
        }
    }

    (a0 + (d1 * s), b0 + (d2 * t), s, t)
}

/// Perpendicular distance from a point to the (possibly finite) segment
/// `[a,b]`, clamped to the segment's endpoints.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (cp, _, _, _) = segment_closest_points(p, p, a, b);
    cp.distance(p)
}

/// A convex polygon in 3-space: an ordered, planar vertex ring plus its
/// unit normal. Used by the clipping and containment routines below; the
/// fracture data model wraps this with the extra bookkeeping fields it
/// needs (family id, adjacency list, etc).
#[derive(Debug, Clone)]
pub struct Polygon3 {
    pub vertices: Vec<Point>,
    pub normal: Normal,
}

impl Polygon3 {
    pub fn new(vertices: Vec<Point>, normal: Normal) -> Polygon3 {
        Polygon3 {
            vertices,
            normal: normal.normalized(),
        }
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.vertices[0], self.normal)
    }

    /// Shoelace-formula area of a planar convex polygon in 3-space.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let origin = self.vertices[0];
        let mut sum = Vector::zero();
        for i in 1..(self.vertices.len() - 1) {
            let e1 = self.vertices[i] - origin;
            let e2 = self.vertices[i + 1] - origin;
            sum = sum + cross(e1, e2);
        }
        sum.length() * 0.5
    }

    /// Tests whether `p` (assumed to already lie in the polygon's plane)
    /// is inside the polygon, via the winding/half-plane test against
    /// each edge.
    pub fn contains_point(&self, p: Point, eps: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let edge = b - a;
            let to_p = p - a;
            let side = dot(cross(edge, to_p).into_normal(), self.normal);
            if side < -eps {
                return false;
            }
        }
        true
    }

    /// Clips the (assumed in-plane) segment `[a,b]` against this convex
    /// polygon's edges, Sutherland-Hodgman style but specialized to a
    /// single segment: each edge halves the remaining parameter interval
    /// `[t0,t1]` along the segment. Returns `None` if the segment lies
    /// entirely outside any edge.
    pub fn clip_segment(&self, a: Point, b: Point, eps: f64) -> Option<(Point, Point)> {
        let n = self.vertices.len();
        if n < 3 {
            return None;
        }
        let d = b - a;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for i in 0..n {
            let v0 = self.vertices[i];
            let v1 = self.vertices[(i + 1) % n];
            let edge = v1 - v0;
            // Inward-pointing normal of this edge, in-plane.
            let edge_normal = cross(edge, self.normal.into_vector());

            let fa = dot(edge_normal, (a - v0));
            let fb = dot(edge_normal, (b - v0));

            if fa.abs() <= eps && fb.abs() <= eps {
                // Segment runs along this edge; doesn't exclude anything.
                continue;
            }

            if fa < -eps && fb < -eps {
                return None; // Entirely outside this edge.
            }
            if fa >= -eps && fb >= -eps {
                continue; // Entirely inside (or touching) this edge.
            }

            // Segment crosses the edge's supporting line; compute t.
            let t = fa / (fa - fb);
            if fa < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        if t0 > t1 {
            return None;
        }
        Some((a + (d * t0), a + (d * t1)))
    }

    /// Sutherland-Hodgman clip of this polygon against a half-space
    /// (the side the plane's normal points towards is kept).
    pub fn clip_by_plane(&self, plane: &Plane, eps: f64) -> Polygon3 {
        let n = self.vertices.len();
        if n == 0 {
            return Polygon3 {
                vertices: Vec::new(),
                normal: self.normal,
            };
        }
        let mut out = Vec::with_capacity(n + 1);
        for i in 0..n {
            let cur = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            let d_cur = plane.signed_distance(cur);
            let d_next = plane.signed_distance(next);

            let cur_in = d_cur >= -eps;
            let next_in = d_next >= -eps;

            if cur_in {
                out.push(cur);
            }
            if cur_in != next_in {
                let denom = d_cur - d_next;
                if denom.abs() > eps {
                    let t = d_cur / denom;
                    out.push(cur + ((next - cur) * t));
                }
            }
        }
        Polygon3 {
            vertices: out,
            normal: self.normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_signed_distance() {
        let p = Plane::new(Point::new(0.0, 0.0, 0.0), Normal::new(0.0, 0.0, 1.0));
        assert!((p.signed_distance(Point::new(5.0, 5.0, 2.0)) - 2.0).abs() < 1e-9);
        assert!((p.signed_distance(Point::new(5.0, 5.0, -2.0)) + 2.0).abs() < 1e-9);
    }

    #[test]
    fn plane_plane_intersection_orthogonal() {
        let a = Plane::new(Point::new(0.0, 0.0, 0.0), Normal::new(0.0, 0.0, 1.0));
        let b = Plane::new(Point::new(0.0, 0.0, 0.0), Normal::new(1.0, 0.0, 0.0));
        let (p, dir) = plane_plane_intersection(&a, &b, 1e-10).unwrap();
        assert!(p.x().abs() < 1e-9);
        assert!(p.z().abs() < 1e-9);
        assert!(dir.x().abs() < 1e-9 && dir.z().abs() < 1e-9);
    }

    #[test]
    fn plane_plane_intersection_parallel_is_none() {
        let a = Plane::new(Point::new(0.0, 0.0, 0.0), Normal::new(0.0, 0.0, 1.0));
        let b = Plane::new(Point::new(0.0, 0.0, 1.0), Normal::new(0.0, 0.0, 1.0));
        assert!(plane_plane_intersection(&a, &b, 1e-10).is_none());
    }

    #[test]
    fn square_area_and_containment() {
        let square = Polygon3::new(
            vec![
                Point::new(-1.0, -1.0, 0.0),
                Point::new(1.0, -1.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(-1.0, 1.0, 0.0),
            ],
            Normal::new(0.0, 0.0, 1.0),
        );
        assert!((square.area() - 4.0).abs() < 1e-9);
        assert!(square.contains_point(Point::new(0.0, 0.0, 0.0), 1e-9));
        assert!(!square.contains_point(Point::new(2.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn clip_segment_through_square() {
        let square = Polygon3::new(
            vec![
                Point::new(-1.0, -1.0, 0.0),
                Point::new(1.0, -1.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(-1.0, 1.0, 0.0),
            ],
            Normal::new(0.0, 0.0, 1.0),
        );
        let clipped = square
            .clip_segment(Point::new(-2.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0), 1e-9)
            .unwrap();
        assert!((clipped.0.x() + 1.0).abs() < 1e-9 || (clipped.1.x() + 1.0).abs() < 1e-9);
        assert!((clipped.0.x() - 1.0).abs() < 1e-9 || (clipped.1.x() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clip_by_plane_truncates_square() {
        let square = Polygon3::new(
            vec![
                Point::new(-1.0, -1.0, 0.0),
                Point::new(1.0, -1.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(-1.0, 1.0, 0.0),
            ],
            Normal::new(0.0, 0.0, 1.0),
        );
        // Keep only x <= 0: half-space with normal pointing -x.
        let plane = Plane::new(Point::new(0.0, 0.0, 0.0), Normal::new(-1.0, 0.0, 0.0));
        let clipped = square.clip_by_plane(&plane, 1e-9);
        assert!((clipped.area() - 2.0).abs() < 1e-9);
    }
}
