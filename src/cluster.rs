//! Cluster/connectivity analysis (§4.H): union-find over accepted
//! fractures via shared intersections, filtered by boundary-face adherence
//! or by the `keepOnlyLargestCluster` / `ignoreBoundaryFaces` overrides.

use crate::config::Config;
use crate::fracture::{FractureId, Polygon};
use crate::intersection::IntersectionArena;

/// The six domain faces in `[-x, +x, -y, +y, -z, +z]` order, matching
/// `Config::boundary_faces`.
const FACE_AXES: [(usize, bool); 6] = [
    (0, true),
    (0, false),
    (1, true),
    (1, false),
    (2, true),
    (2, false),
];

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> UnionFind {
        UnionFind {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Result of cluster analysis: group id assigned per accepted fracture,
/// plus the final surviving index list.
pub struct ClusterResult {
    /// Parallel to the accepted-polygon slice; each fracture's connected
    /// component id.
    pub group_ids: Vec<usize>,
    /// Indices (into the accepted-polygon slice) of fractures that survive
    /// §4.H's filtering rule.
    pub final_fractures: Vec<FractureId>,
}

/// Does any vertex of `poly` lie on domain face `(axis, is_min)` within
/// `eps`?
fn touches_face(poly: &Polygon, axis: usize, is_min: bool, cfg: &Config) -> bool {
    let (min, max) = cfg.domain_bounds();
    let target = if is_min { min[axis] } else { max[axis] };
    poly.vertices.iter().any(|v| {
        let coord = match axis {
            0 => v.x(),
            1 => v.y(),
            _ => v.z(),
        };
        (coord - target).abs() <= cfg.eps
    })
}

/// Runs union-find over `accepted` via `arena`'s intersection records, then
/// applies the §4.H filtering rule:
/// - `keep_only_largest_cluster`: the single largest component survives.
/// - `ignore_boundary_faces`: every component with >= 1 intersection
///   survives.
/// - otherwise: the union of components touching every requested
///   boundary face survives.
///
/// Isolated fractures (size-1 components with no intersections) are
/// always dropped in the first and second cases.
pub fn analyze(accepted: &[Polygon], arena: &IntersectionArena, cfg: &Config) -> ClusterResult {
    let n = accepted.len();
    let mut uf = UnionFind::new(n);
    for record in arena.records() {
        uf.union(record.fracture_a.0, record.fracture_b.0);
    }

    let mut group_ids = vec![0usize; n];
    for i in 0..n {
        group_ids[i] = uf.find(i);
    }

    let mut component_members: std::collections::BTreeMap<usize, Vec<usize>> =
        std::collections::BTreeMap::new();
    for (i, &root) in group_ids.iter().enumerate() {
        component_members.entry(root).or_default().push(i);
    }

    let has_intersections = |idx: usize| !accepted[idx].intersection_ids.is_empty();

    let final_indices: Vec<usize> = if cfg.ignore_boundary_faces {
        // §4.H (c): every component survives, isolated or not — isolated
        // fractures are only ever dropped in paths (a) and (b).
        (0..accepted.len()).collect()
    } else if cfg.keep_only_largest_cluster {
        component_members
            .values()
            .filter(|members| members.len() > 1 || members.iter().any(|&i| has_intersections(i)))
            .max_by_key(|members| members.len())
            .cloned()
            .unwrap_or_default()
    } else {
        let requested: Vec<usize> = (0..6).filter(|&f| cfg.boundary_faces[f]).collect();
        component_members
            .values()
            .filter(|members| members.len() > 1 || members.iter().any(|&i| has_intersections(i)))
            .filter(|members| {
                requested.iter().all(|&f| {
                    let (axis, is_min) = FACE_AXES[f];
                    members.iter().any(|&i| touches_face(&accepted[i], axis, is_min, cfg))
                })
            })
            .flatten()
            .copied()
            .collect()
    };

    ClusterResult {
        group_ids,
        final_fractures: final_indices.into_iter().map(FractureId).collect(),
    }
}
