//! Shape builder (§4.C): turns a sampled radius/orientation/translation
//! into a candidate [`Polygon`] in its local frame, rotated and translated
//! into place. Bounding box and adjacency list are left for the caller
//! (truncation and FRAM) to fill in; this module only emits geometry.

use dfn_math::{Normal, Point, Vector};

use crate::family::{ShapeFamily, ShapeKind};
use crate::fracture::Polygon;

/// Builds an unclipped candidate polygon for `family`, given an already
/// sampled radius, unit normal, and center. The in-plane basis is derived
/// from the normal via the same orthonormal-basis construction `dfn_math`
/// already provides for shading frames.
pub fn build_candidate(
    family: &ShapeFamily,
    radius: f64,
    normal: Normal,
    center: Point,
) -> Polygon {
    let n = normal.normalized();
    let (_, u, v) = dfn_math::coordinate_system_from_vector(n.into_vector());

    let (x_radius, y_radius, local_vertices) = match family.kind {
        ShapeKind::Ellipse => (radius, radius, ellipse_vertices(radius, radius, family.n_vertices)),
        ShapeKind::Rectangle => {
            let half_x = radius;
            let half_y = radius * family.aspect_ratio;
            (half_x, half_y, rectangle_vertices(half_x, half_y))
        }
    };

    let vertices = local_vertices
        .into_iter()
        .map(|(lx, ly)| center + (u * lx) + (v * ly))
        .collect();

    Polygon {
        family: family.index as i64,
        group_id: None,
        normal: n,
        basis_u: u,
        basis_v: v,
        center,
        x_radius,
        y_radius,
        vertices,
        truncated: false,
        intersection_ids: Vec::new(),
    }
}

/// Discretizes an axis-aligned ellipse of semi-axes `(rx, ry)` in the local
/// frame into `n` vertices, evenly spaced by angle (§4.C: "typically
/// 8-16").
fn ellipse_vertices(rx: f64, ry: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(3);
    (0..n)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / (n as f64);
            (rx * theta.cos(), ry * theta.sin())
        })
        .collect()
}

/// Four corners of an axis-aligned rectangle of half-lengths `(hx, hy)` in
/// the local frame, wound counter-clockwise.
fn rectangle_vertices(hx: f64, hy: f64) -> Vec<(f64, f64)> {
    vec![(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)]
}

/// Builds a user-defined polygon directly from an explicit vertex ring
/// (§4.I: "polygons-by-coord"). The normal is derived from the first three
/// vertices via Newell's method rather than assumed, since user input may
/// not state it explicitly.
pub fn build_user_polygon(family: i64, vertices: Vec<Point>) -> Polygon {
    let normal = newell_normal(&vertices);
    let (_, u, v) = dfn_math::coordinate_system_from_vector(normal.into_vector());
    let center = centroid(&vertices);
    Polygon {
        family,
        group_id: None,
        normal,
        basis_u: u,
        basis_v: v,
        center,
        x_radius: 0.0,
        y_radius: 0.0,
        vertices,
        truncated: false,
        intersection_ids: Vec::new(),
    }
}

fn newell_normal(vertices: &[Point]) -> Normal {
    let mut acc = Vector::zero();
    let n = vertices.len();
    for i in 0..n {
        let cur = vertices[i];
        let next = vertices[(i + 1) % n];
        acc = acc
            + Vector::new(
                (cur.y() - next.y()) * (cur.z() + next.z()),
                (cur.z() - next.z()) * (cur.x() + next.x()),
                (cur.x() - next.x()) * (cur.y() + next.y()),
            );
    }
    acc.into_normal().normalized()
}

fn centroid(vertices: &[Point]) -> Point {
    let n = vertices.len() as f64;
    let sum = vertices
        .iter()
        .fold(Vector::zero(), |acc, p| acc + p.into_vector());
    Point::new(0.0, 0.0, 0.0) + (sum / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::{OrientationDistribution, RadiusDistribution, RegionSpec};

    fn rect_family() -> ShapeFamily {
        ShapeFamily {
            index: 0,
            kind: ShapeKind::Rectangle,
            n_vertices: 4,
            orientation: OrientationDistribution {
                mean_normal: [0.0, 0.0, 1.0],
                kappa: f64::INFINITY,
            },
            radius: RadiusDistribution::Constant { radius: 0.3 },
            region: RegionSpec::WholeDomain,
            p32_target: 0.0,
            probability: 1.0,
            aspect_ratio: 1.0,
            radii_list: Vec::new(),
            radii_list_cursor: 0,
            current_p32: 0.0,
            complete: false,
            accepted_count: 0,
            rejected_count: 0,
            expected_count: 0,
        }
    }

    #[test]
    fn rectangle_area_matches_constant_size() {
        let fam = rect_family();
        let poly = build_candidate(
            &fam,
            0.3,
            Normal::new(0.0, 0.0, 1.0),
            Point::new(0.0, 0.0, 0.0),
        );
        assert_eq!(poly.vertices.len(), 4);
        assert!((poly.area() - 0.36).abs() < 1e-9);
    }

    #[test]
    fn ellipse_vertex_count_matches_family() {
        let mut fam = rect_family();
        fam.kind = ShapeKind::Ellipse;
        fam.n_vertices = 12;
        let poly = build_candidate(
            &fam,
            0.5,
            Normal::new(0.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
        );
        assert_eq!(poly.vertices.len(), 12);
    }

    #[test]
    fn user_polygon_normal_matches_winding() {
        let verts = vec![
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(-1.0, 1.0, 0.0),
        ];
        let poly = build_user_polygon(-1, verts);
        assert!((poly.normal.z().abs() - 1.0).abs() < 1e-9);
    }
}
