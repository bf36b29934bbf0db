//! Fracture polygon data model (§3 "Fracture polygon").

use dfn_math::{BBox, Normal, Point, Vector};

/// Index into the accepted-fracture arena. Intersections and triple points
/// reference polygons by id, never by owning reference (§9 design note).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FractureId(pub usize);

#[derive(Debug, Clone)]
pub struct Polygon {
    /// Negative for user-defined fractures; `0..` for stochastic families.
    pub family: i64,
    /// Cluster/connectivity group, assigned lazily by §4.H.
    pub group_id: Option<usize>,

    pub normal: Normal,
    /// In-plane orthonormal basis (u, v), with `normal` completing a
    /// right-handed frame.
    pub basis_u: Vector,
    pub basis_v: Vector,

    pub center: Point,
    pub x_radius: f64,
    pub y_radius: f64,

    /// Ordered, convex, planar vertex ring.
    pub vertices: Vec<Point>,

    pub truncated: bool,

    /// Ids of [`crate::intersection::IntersectionRecord`]s this polygon
    /// participates in.
    pub intersection_ids: Vec<crate::intersection::IntersectionId>,
}

impl Polygon {
    pub fn is_user_defined(&self) -> bool {
        self.family < 0
    }

    pub fn as_polygon3(&self) -> dfn_math::Polygon3 {
        dfn_math::Polygon3::new(self.vertices.clone(), self.normal)
    }

    pub fn area(&self) -> f64 {
        self.as_polygon3().area()
    }

    pub fn aabb(&self) -> BBox {
        BBox::from_point_cloud(&self.vertices)
    }

    /// No two vertices of a well-formed polygon may lie within `eps` of
    /// each other (§3 invariant).
    pub fn has_degenerate_adjacent_vertices(&self, eps: f64) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if a.distance(b) <= eps {
                return true;
            }
        }
        false
    }

    /// Perpendicular distance from `p` (assumed in-plane) to the nearest
    /// edge of this polygon.
    pub fn distance_to_nearest_edge(&self, p: Point) -> f64 {
        let n = self.vertices.len();
        let mut min_d = f64::INFINITY;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let d = dfn_math::point_segment_distance(p, a, b);
            if d < min_d {
                min_d = d;
            }
        }
        min_d
    }

    pub fn distance_to_nearest_vertex(&self, p: Point) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Perpendicular distance from `p` to the nearest edge of this polygon,
    /// skipping any edge `p` already lies on (within `eps`). A clipped
    /// intersection endpoint lies exactly on the polygon edge it exited
    /// through by construction, so that edge isn't a clearance violation —
    /// only distance to the *other* edges is meaningful for FRAM's
    /// close-to-edge predicate.
    pub fn distance_to_nearest_edge_excluding_incident(&self, p: Point, eps: f64) -> f64 {
        let n = self.vertices.len();
        let mut min_d = f64::INFINITY;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let d = dfn_math::point_segment_distance(p, a, b);
            if d <= eps {
                continue;
            }
            if d < min_d {
                min_d = d;
            }
        }
        min_d
    }
}
