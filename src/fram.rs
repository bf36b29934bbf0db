//! The FRAM intersection checker (§4.E), the centerpiece of the insertion
//! engine: computes new intersection segments between a candidate and the
//! already-accepted fractures, and enforces the clearance predicates that
//! keep the arrangement mesh-safe.

use dfn_math::Point;

use crate::config::Config;
use crate::fracture::{FractureId, Polygon};
use crate::intersection::{IntersectionArena, IntersectionId};

/// One-to-one with the clearance predicates in §4.E. `Accept` (reject code
/// `0`) is included so the driver can match exhaustively without an `Ok`
/// wrapper duplicating the same information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
    Accept,
    Outside,
    ShortIntersection,
    CloseToNode,
    CloseToEdge,
    ClosePointToEdge,
    InterCloseToInter,
    Triple,
}

impl std::fmt::Display for RejectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectCode::Accept => "accept",
            RejectCode::Outside => "outside domain",
            RejectCode::ShortIntersection => "short intersection",
            RejectCode::CloseToNode => "close to node",
            RejectCode::CloseToEdge => "close to edge",
            RejectCode::ClosePointToEdge => "vertex close to edge",
            RejectCode::InterCloseToInter => "intersection close to intersection",
            RejectCode::Triple => "triple intersection too close",
        };
        write!(f, "{}", s)
    }
}

/// A new `candidate <-> other` intersection segment awaiting commit.
#[derive(Debug, Clone)]
pub struct NewIntersection {
    pub other: FractureId,
    pub endpoints: [Point; 2],
    pub original_length: f64,
    pub shortened: bool,
}

/// A candidate triple point discovered while checking `candidate`. Only
/// registered as a real [`crate::intersection::TriplePoint`] by the driver
/// when a third pairwise segment (`candidate` <-> the far fracture of
/// `existing_record`) was also found among this same candidate's new
/// intersections; otherwise it was only used to enforce the clearance
/// predicate and is dropped.
#[derive(Debug, Clone)]
pub struct TripleCandidate {
    pub point: Point,
    pub new_intersection_index: usize,
    pub existing_record: IntersectionId,
    pub far_fracture: FractureId,
}

#[derive(Debug, Clone, Default)]
pub struct FramAccept {
    pub new_intersections: Vec<NewIntersection>,
    pub triple_candidates: Vec<TripleCandidate>,
}

/// Runs the FRAM predicates for `candidate` against every already-accepted
/// polygon with an overlapping AABB (§4.E step 1, broadphase).
pub fn check(
    candidate: &Polygon,
    accepted: &[Polygon],
    arena: &IntersectionArena,
    cfg: &Config,
) -> Result<FramAccept, RejectCode> {
    if cfg.disable_fram {
        return Ok(FramAccept::default());
    }

    let h = cfg.h;
    let eps = cfg.eps;
    let candidate_aabb = candidate.aabb();
    let candidate_poly3 = candidate.as_polygon3();

    let mut accept = FramAccept::default();

    for (qi, q) in accepted.iter().enumerate() {
        let q_id = FractureId(qi);

        // Vertex-close-to-edge applies even between non-intersecting,
        // non-coplanar polygons, so it runs for every AABB-overlapping
        // pair regardless of whether a plane intersection exists.
        if candidate_aabb.overlaps(&q.aabb()) {
            check_vertex_close_to_edge(candidate, q, h)?;
        } else {
            continue;
        }

        let p_plane = candidate_poly3.plane();
        let q_plane = q.as_polygon3().plane();

        let (line_point, line_dir) = match dfn_math::plane_plane_intersection(&p_plane, &q_plane, eps) {
            Some(l) => l,
            None => continue, // Parallel planes; no intersection to check.
        };

        // A point far along the line in each direction, then clip against
        // both polygons to find the mutual overlap segment.
        let far = line_dir * (candidate_aabb.diagonal() + q.aabb().diagonal() + 1.0);
        let raw_a = line_point - far;
        let raw_b = line_point + far;

        let clipped_p = match candidate_poly3.clip_segment(raw_a, raw_b, eps) {
            Some(s) => s,
            None => continue,
        };
        let clipped_q = match q.as_polygon3().clip_segment(clipped_p.0, clipped_p.1, eps) {
            Some(s) => s,
            None => continue,
        };

        let (a, b) = clipped_q;
        let length = a.distance(b);

        if length < h {
            return Err(RejectCode::ShortIntersection);
        }

        // Close to node: either endpoint within h of any vertex of P or Q.
        for &endpoint in &[a, b] {
            if candidate.distance_to_nearest_vertex(endpoint) < h
                || q.distance_to_nearest_vertex(endpoint) < h
            {
                return Err(RejectCode::CloseToNode);
            }
        }

        // Close to edge: either endpoint within h of an edge of P or Q,
        // other than the edge it terminates on (every clipped endpoint
        // lies exactly on one such edge by construction and that is the
        // normal case, not a clearance violation).
        for &endpoint in &[a, b] {
            if candidate.distance_to_nearest_edge_excluding_incident(endpoint, eps) < h
                || q.distance_to_nearest_edge_excluding_incident(endpoint, eps) < h
            {
                return Err(RejectCode::CloseToEdge);
            }
        }

        // Intersection-close-to-intersection: compare against every
        // pre-existing record on Q, shortening only when the remainder
        // would still clear h.
        let mut final_a = a;
        let mut final_b = b;
        let mut shortened = false;
        for rid in arena.records_on(q_id) {
            let r = arena.record(rid);
            let (cp_s, cp_r, t_s, _t_r) =
                dfn_math::segment_closest_points(final_a, final_b, r.endpoints[0], r.endpoints[1]);
            let d = cp_s.distance(cp_r);
            if d < h {
                // Try shortening the end of S nearer to the offending
                // parameter value, keeping the far endpoint fixed.
                let (keep, _drop) = if t_s > 0.5 { (final_a, final_b) } else { (final_b, final_a) };
                let new_len = keep.distance(cp_s);
                if new_len >= h {
                    shortened = true;
                    if t_s > 0.5 {
                        final_b = cp_s;
                    } else {
                        final_a = cp_s;
                    }
                } else {
                    return Err(RejectCode::InterCloseToInter);
                }
            }
        }

        // Triple intersection: does S cross any existing record on Q?
        let mut triple_candidates_for_q = Vec::new();
        for rid in arena.records_on(q_id) {
            let r = arena.record(rid);
            let (cp_s, cp_r, t_s, t_r) =
                dfn_math::segment_closest_points(final_a, final_b, r.endpoints[0], r.endpoints[1]);
            let crossing = cp_s.distance(cp_r) <= eps && t_s > eps && t_s < 1.0 - eps && t_r > eps && t_r < 1.0 - eps;
            if !crossing {
                continue;
            }
            let far_fracture = r.other(q_id);
            let t = cp_s;

            let far_poly = &accepted[far_fracture.0];
            if candidate.distance_to_nearest_vertex(t) < h
                || q.distance_to_nearest_vertex(t) < h
                || far_poly.distance_to_nearest_vertex(t) < h
            {
                return Err(RejectCode::Triple);
            }
            if t.distance(final_a) < h || t.distance(final_b) < h {
                return Err(RejectCode::Triple);
            }
            if t.distance(r.endpoints[0]) < h || t.distance(r.endpoints[1]) < h {
                return Err(RejectCode::Triple);
            }
            for existing_tp in arena.triple_points_on(rid) {
                if existing_tp.point.distance(t) < h {
                    return Err(RejectCode::Triple);
                }
            }

            triple_candidates_for_q.push((t, rid, far_fracture));
        }

        let new_index = accept.new_intersections.len();
        accept.new_intersections.push(NewIntersection {
            other: q_id,
            endpoints: [final_a, final_b],
            original_length: length,
            shortened,
        });
        for (point, existing_record, far_fracture) in triple_candidates_for_q {
            accept.triple_candidates.push(TripleCandidate {
                point,
                new_intersection_index: new_index,
                existing_record,
                far_fracture,
            });
        }
    }

    Ok(accept)
}

/// Vertex-close-to-edge: any vertex of `a` within `h` of an edge of `b`,
/// or vice versa, measured in 3-space. Genuine intersection endpoints are
/// checked separately by the close-to-node/close-to-edge predicates above,
/// which run first and take priority when both would otherwise fire for
/// the same configuration.
fn check_vertex_close_to_edge(a: &Polygon, b: &Polygon, h: f64) -> Result<(), RejectCode> {
    for v in &a.vertices {
        if b.distance_to_nearest_edge(*v) < h {
            return Err(RejectCode::ClosePointToEdge);
        }
    }
    for v in &b.vertices {
        if a.distance_to_nearest_edge(*v) < h {
            return Err(RejectCode::ClosePointToEdge);
        }
    }
    Ok(())
}
