//! Domain truncator (§4.D): clips a candidate polygon against the domain's
//! six half-spaces (and, for layer/region families, the family's sub-box)
//! via repeated Sutherland-Hodgman clipping, since the clipped result of a
//! convex polygon against a convex region stays convex.

use dfn_math::{Normal, Plane, Point};

use crate::config::Config;
use crate::family::RegionSpec;
use crate::fracture::Polygon;

/// Outcome of attempting to truncate a candidate against the domain (and
/// its family's region, if any).
pub enum TruncateOutcome {
    /// Clipping left at least 3 vertices, none degenerate; `changed`
    /// records whether any vertex was actually removed or moved, for the
    /// `truncated` flag (§4.D).
    Kept { changed: bool },
    /// Fewer than 3 vertices remained, or two adjacent vertices collapsed
    /// within `eps` — reported as the `Outside` reject code (§4.D).
    Outside,
}

/// Clips `poly` in place against the domain box and, if `region` names a
/// layer or sub-box, against that region's box too. Mutates
/// `poly.vertices` and `poly.truncated`.
pub fn truncate(poly: &mut Polygon, region: RegionSpec, cfg: &Config) -> TruncateOutcome {
    let original_count = poly.vertices.len();
    let (dmin, dmax) = cfg.domain_bounds();
    let mut changed = clip_to_box(poly, dmin, dmax, cfg.eps);

    match region {
        RegionSpec::WholeDomain => {}
        RegionSpec::Layer(i) => {
            let layer = cfg.layers[i];
            let (dmin, dmax) = cfg.domain_bounds();
            let lmin = [dmin[0], dmin[1], layer.z_min];
            let lmax = [dmax[0], dmax[1], layer.z_max];
            changed |= clip_to_box(poly, lmin, lmax, cfg.eps);
        }
        RegionSpec::Region(i) => {
            let r = cfg.regions[i];
            changed |= clip_to_box(poly, r.min, r.max, cfg.eps);
        }
    }

    if poly.vertices.len() < 3 || poly.has_degenerate_adjacent_vertices(cfg.eps) {
        return TruncateOutcome::Outside;
    }

    poly.truncated = changed || poly.vertices.len() != original_count;
    TruncateOutcome::Kept {
        changed: poly.truncated,
    }
}

/// Six half-space clips against an axis-aligned box `[min, max]`. Returns
/// whether the vertex set actually changed.
fn clip_to_box(poly: &mut Polygon, min: [f64; 3], max: [f64; 3], eps: f64) -> bool {
    let before = poly.vertices.clone();
    let mut p3 = poly.as_polygon3();

    let planes = [
        Plane::new(Point::new(min[0], 0.0, 0.0), Normal::new(1.0, 0.0, 0.0)),
        Plane::new(Point::new(max[0], 0.0, 0.0), Normal::new(-1.0, 0.0, 0.0)),
        Plane::new(Point::new(0.0, min[1], 0.0), Normal::new(0.0, 1.0, 0.0)),
        Plane::new(Point::new(0.0, max[1], 0.0), Normal::new(0.0, -1.0, 0.0)),
        Plane::new(Point::new(0.0, 0.0, min[2]), Normal::new(0.0, 0.0, 1.0)),
        Plane::new(Point::new(0.0, 0.0, max[2]), Normal::new(0.0, 0.0, -1.0)),
    ];

    for plane in &planes {
        if p3.vertices.len() < 3 {
            break;
        }
        p3 = p3.clip_by_plane(plane, eps);
    }

    poly.vertices = p3.vertices;
    poly.vertices.len() != before.len()
        || poly
            .vertices
            .iter()
            .zip(before.iter())
            .any(|(a, b)| a.distance(*b) > eps)
}

/// Idempotence check used by §8's "running truncation twice is a no-op":
/// re-truncating an already-truncated polygon against the same box leaves
/// the vertex set unchanged.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::RegionSpec;

    fn base_cfg() -> Config {
        Config {
            h: 0.1,
            eps: 1e-9,
            domain_size: [1.0, 1.0, 1.0],
            layers: Vec::new(),
            regions: Vec::new(),
            seed: 1,
            n_fam_ell: 0,
            n_fam_rect: 0,
            n_poly: 0,
            stop_condition: crate::config::StopCondition::NPoly,
            rejects_per_fracture: 10,
            radii_list_increase: 0.1,
            disable_fram: false,
            print_reject_reasons: false,
            output_all_radii: false,
            insert_user_rectangles_first: false,
            remove_fractures_less_than: 0.0,
            polygon_boundary_flag: false,
            ignore_boundary_faces: false,
            keep_only_largest_cluster: false,
            boundary_faces: [false; 6],
        }
    }

    #[test]
    fn polygon_fully_inside_domain_is_unchanged() {
        let cfg = base_cfg();
        let mut poly = crate::shape::build_user_polygon(
            -1,
            vec![
                Point::new(-0.1, -0.1, 0.0),
                Point::new(0.1, -0.1, 0.0),
                Point::new(0.1, 0.1, 0.0),
                Point::new(-0.1, 0.1, 0.0),
            ],
        );
        let before = poly.vertices.clone();
        let outcome = truncate(&mut poly, RegionSpec::WholeDomain, &cfg);
        assert!(matches!(outcome, TruncateOutcome::Kept { changed: false }));
        assert_eq!(poly.vertices, before);
    }

    #[test]
    fn polygon_crossing_boundary_is_clipped_and_marked_truncated() {
        let cfg = base_cfg();
        let mut poly = crate::shape::build_user_polygon(
            -1,
            vec![
                Point::new(-0.8, -0.8, 0.0),
                Point::new(0.8, -0.8, 0.0),
                Point::new(0.8, 0.8, 0.0),
                Point::new(-0.8, 0.8, 0.0),
            ],
        );
        let outcome = truncate(&mut poly, RegionSpec::WholeDomain, &cfg);
        assert!(matches!(outcome, TruncateOutcome::Kept { changed: true }));
        assert!(poly.truncated);
        for v in &poly.vertices {
            assert!(v.x() <= 0.5 + 1e-9 && v.x() >= -0.5 - 1e-9);
            assert!(v.y() <= 0.5 + 1e-9 && v.y() >= -0.5 - 1e-9);
        }
    }

    #[test]
    fn polygon_entirely_outside_domain_is_rejected() {
        let cfg = base_cfg();
        let mut poly = crate::shape::build_user_polygon(
            -1,
            vec![
                Point::new(2.0, 2.0, 0.0),
                Point::new(3.0, 2.0, 0.0),
                Point::new(3.0, 3.0, 0.0),
                Point::new(2.0, 3.0, 0.0),
            ],
        );
        let outcome = truncate(&mut poly, RegionSpec::WholeDomain, &cfg);
        assert!(matches!(outcome, TruncateOutcome::Outside));
    }

    #[test]
    fn truncating_twice_is_idempotent() {
        let cfg = base_cfg();
        let mut poly = crate::shape::build_user_polygon(
            -1,
            vec![
                Point::new(-0.8, -0.8, 0.0),
                Point::new(0.8, -0.8, 0.0),
                Point::new(0.8, 0.8, 0.0),
                Point::new(-0.8, 0.8, 0.0),
            ],
        );
        truncate(&mut poly, RegionSpec::WholeDomain, &cfg);
        let once = poly.vertices.clone();
        let outcome = truncate(&mut poly, RegionSpec::WholeDomain, &cfg);
        assert!(matches!(outcome, TruncateOutcome::Kept { changed: false }));
        assert_eq!(poly.vertices, once);
    }
}
