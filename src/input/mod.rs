//! Input-file reader (§6 "Input file"). The on-disk format is a flat
//! `keyword: value` text file, parsed line-by-line with the `nom`
//! combinators in [`basics`] rather than built as a tree (unlike the
//! teacher's nested `.psy`/`DataTree` format, DFN input has no nesting
//! beyond family/user-fracture blocks, which this reader treats as simple
//! `beginX`/`endX` spans).

pub mod basics;

use dfn_math::Point;

use crate::config::{Config, Layer, Region, StopCondition};
use crate::driver::{UserFracture, UserFractureKind};
use crate::error::InputError;
use crate::family::{
    OrientationDistribution, RadiusDistribution, RegionSpec, ShapeFamily, ShapeKind,
};

use self::basics::{parse_bool_list, parse_f64_list, ws_f64, ws_usize};

/// Parsed input: the immutable run configuration, the shape families
/// (stochastic), and the user-defined fractures to insert first.
pub struct ParsedInput {
    pub config: Config,
    pub families: Vec<ShapeFamily>,
    pub user_fractures: Vec<UserFracture>,
}

struct RawFamily {
    shape: String,
    n_vertices: usize,
    kappa: f64,
    mean_normal: [f64; 3],
    radius_dist: String,
    radius_params: Vec<f64>,
    region: String,
    p32_target: f64,
    aspect_ratio: f64,
    probability: f64,
}

/// Reads and parses the input file at `path` (§6: the core's only input
/// collaborator).
pub fn read_input_file(path: &str) -> Result<ParsedInput, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_string(),
        source,
    })?;
    parse(&text)
}

fn parse(text: &str) -> Result<ParsedInput, InputError> {
    let mut h = None;
    let mut seed = None;
    let mut domain_size = None;
    let mut n_fam_ell = None;
    let mut n_fam_rect = None;
    let mut n_poly = None;
    let mut stop_condition = None;
    let mut fam_prob = Vec::new();
    let mut rejects_per_fracture = 10u32;
    let mut radii_list_increase = 0.1;
    let mut disable_fram = false;
    let mut print_reject_reasons = false;
    let mut output_all_radii = false;
    let mut insert_user_rectangles_first = false;
    let mut remove_fractures_less_than = 0.0;
    let mut polygon_boundary_flag = false;
    let mut ignore_boundary_faces = false;
    let mut keep_only_largest_cluster = false;
    let mut boundary_faces = [true; 6];
    let mut layers = Vec::new();
    let mut regions = Vec::new();

    let mut raw_families = Vec::new();
    let mut user_fractures = Vec::new();

    let mut lines = text.lines().enumerate().peekable();
    while let Some((line_no, raw_line)) = lines.next() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("beginFamily") {
            let block = collect_block(&mut lines, "endFamily", line_no)?;
            raw_families.push(parse_family_block(&block, line_no)?);
            continue;
        }
        if line.eq_ignore_ascii_case("beginUserRect")
            || line.eq_ignore_ascii_case("beginUserEllipse")
            || line.eq_ignore_ascii_case("beginUserPolygon")
        {
            let end_tag = match line.to_ascii_lowercase().as_str() {
                "beginuserrect" => "endUserRect",
                "beginuserellipse" => "endUserEllipse",
                _ => "endUserPolygon",
            };
            let kind = match line.to_ascii_lowercase().as_str() {
                "beginuserrect" => UserFractureKind::Rectangle,
                "beginuserellipse" => UserFractureKind::Ellipse,
                _ => UserFractureKind::ByCoord,
            };
            let block = collect_block(&mut lines, end_tag, line_no)?;
            for (i, vertex_line) in block.iter().enumerate() {
                let coords = parse_f64_list(vertex_line);
                if coords.len() < 9 || coords.len() % 3 != 0 {
                    return Err(InputError::Parse {
                        line: line_no + i + 1,
                        message: "expected a multiple-of-3 coordinate list with >= 3 vertices".to_string(),
                    });
                }
                let vertices = coords.chunks(3).map(|c| Point::new(c[0], c[1], c[2])).collect();
                user_fractures.push(UserFracture { kind, vertices });
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(InputError::Parse {
                line: line_no + 1,
                message: format!("expected 'keyword: value', got '{line}'"),
            });
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "h" => h = Some(parse_scalar_f64(value, line_no)?),
            "seed" => seed = Some(parse_scalar_u64(value, line_no)?),
            "domainSize" => domain_size = Some(parse_f64_list(value)),
            "nFamEll" => n_fam_ell = Some(parse_scalar_usize(value, line_no)?),
            "nFamRect" => n_fam_rect = Some(parse_scalar_usize(value, line_no)?),
            "nPoly" => n_poly = Some(parse_scalar_u64(value, line_no)?),
            "stopCondition" => {
                stop_condition = Some(if parse_scalar_u64(value, line_no)? == 0 {
                    StopCondition::NPoly
                } else {
                    StopCondition::P32
                })
            }
            "famProb" => fam_prob = parse_f64_list(value),
            "rejectsPerFracture" => rejects_per_fracture = parse_scalar_u64(value, line_no)? as u32,
            "radiiListIncrease" => radii_list_increase = parse_scalar_f64(value, line_no)?,
            "disableFram" => disable_fram = parse_scalar_bool(value, line_no)?,
            "printRejectReasons" => print_reject_reasons = parse_scalar_bool(value, line_no)?,
            "outputAllRadii" => output_all_radii = parse_scalar_bool(value, line_no)?,
            "insertUserRectanglesFirst" => insert_user_rectangles_first = parse_scalar_bool(value, line_no)?,
            "removeFracturesLessThan" => remove_fractures_less_than = parse_scalar_f64(value, line_no)?,
            "polygonBoundaryFlag" => polygon_boundary_flag = parse_scalar_bool(value, line_no)?,
            "ignoreBoundaryFaces" => ignore_boundary_faces = parse_scalar_bool(value, line_no)?,
            "keepOnlyLargestCluster" => keep_only_largest_cluster = parse_scalar_bool(value, line_no)?,
            "boundaryFaces" => {
                let flags = parse_bool_list(value);
                if flags.len() == 6 {
                    boundary_faces.copy_from_slice(&flags);
                }
            }
            "layers" => {
                let nums = parse_f64_list(value);
                layers = nums
                    .chunks(2)
                    .map(|c| Layer { z_min: c[0], z_max: c[1] })
                    .collect();
            }
            "regions" => {
                let nums = parse_f64_list(value);
                regions = nums
                    .chunks(6)
                    .map(|c| Region {
                        min: [c[0], c[1], c[2]],
                        max: [c[3], c[4], c[5]],
                    })
                    .collect();
            }
            _ => {
                // Unknown keywords are ignored rather than fatal, matching
                // a flat keyword file's forward-compatibility expectation.
            }
        }
    }

    let h = h.ok_or(InputError::MissingKeyword("h"))?;
    let domain_size_vec = domain_size.ok_or(InputError::MissingKeyword("domainSize"))?;
    if domain_size_vec.len() != 3 {
        return Err(InputError::Parse {
            line: 0,
            message: "domainSize must have exactly 3 values".to_string(),
        });
    }
    let domain_size = [domain_size_vec[0], domain_size_vec[1], domain_size_vec[2]];

    let config = Config {
        h,
        eps: h * 1e-8,
        domain_size,
        layers,
        regions,
        seed: seed.unwrap_or(0),
        n_fam_ell: n_fam_ell.unwrap_or(0),
        n_fam_rect: n_fam_rect.unwrap_or(0),
        n_poly: n_poly.unwrap_or(0),
        stop_condition: stop_condition.unwrap_or(StopCondition::NPoly),
        rejects_per_fracture,
        radii_list_increase,
        disable_fram,
        print_reject_reasons,
        output_all_radii,
        insert_user_rectangles_first,
        remove_fractures_less_than,
        polygon_boundary_flag,
        ignore_boundary_faces,
        keep_only_largest_cluster,
        boundary_faces,
    };

    let families = raw_families
        .into_iter()
        .enumerate()
        .map(|(i, raw)| build_family(i, raw, &config, fam_prob.get(i).copied().unwrap_or(0.0)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedInput {
        config,
        families,
        user_fractures,
    })
}

fn build_family(
    index: usize,
    raw: RawFamily,
    cfg: &Config,
    probability: f64,
) -> Result<ShapeFamily, InputError> {
    let kind = match raw.shape.to_ascii_lowercase().as_str() {
        "ellipse" => ShapeKind::Ellipse,
        "rectangle" => ShapeKind::Rectangle,
        other => {
            return Err(InputError::Parse {
                line: 0,
                message: format!("unknown shape kind '{other}'"),
            })
        }
    };

    let radius = match raw.radius_dist.to_ascii_lowercase().as_str() {
        "lognormal" => RadiusDistribution::LogNormal {
            mu: raw.radius_params[0],
            sigma: raw.radius_params[1],
            rmin: raw.radius_params[2],
            rmax: raw.radius_params[3],
        },
        "powerlaw" => RadiusDistribution::PowerLaw {
            alpha: raw.radius_params[0],
            rmin: raw.radius_params[1],
            rmax: raw.radius_params[2],
        },
        "exponential" => RadiusDistribution::Exponential {
            lambda: raw.radius_params[0],
            rmin: raw.radius_params[1],
            rmax: raw.radius_params[2],
        },
        "constant" => RadiusDistribution::Constant {
            radius: raw.radius_params[0],
        },
        other => {
            return Err(InputError::Parse {
                line: 0,
                message: format!("unknown radius distribution '{other}'"),
            })
        }
    };

    let region = match raw.region.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["whole"] => RegionSpec::WholeDomain,
        ["layer", n] => RegionSpec::Layer(n.parse().map_err(|_| InputError::Parse {
            line: 0,
            message: "invalid layer index".to_string(),
        })?),
        ["region", n] => RegionSpec::Region(n.parse().map_err(|_| InputError::Parse {
            line: 0,
            message: "invalid region index".to_string(),
        })?),
        _ => {
            return Err(InputError::Parse {
                line: 0,
                message: format!("unrecognized region spec '{}'", raw.region),
            })
        }
    };
    let _ = cfg;

    Ok(ShapeFamily {
        index,
        kind,
        n_vertices: raw.n_vertices,
        orientation: OrientationDistribution {
            mean_normal: raw.mean_normal,
            kappa: raw.kappa,
        },
        radius,
        region,
        p32_target: raw.p32_target,
        probability: if raw.probability > 0.0 { raw.probability } else { probability },
        aspect_ratio: raw.aspect_ratio,
        radii_list: Vec::new(),
        radii_list_cursor: 0,
        current_p32: 0.0,
        complete: false,
        accepted_count: 0,
        rejected_count: 0,
        expected_count: 0,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn collect_block<'a>(
    lines: &mut std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    end_tag: &str,
    start_line: usize,
) -> Result<Vec<&'a str>, InputError> {
    let mut out = Vec::new();
    loop {
        match lines.next() {
            Some((_, raw)) => {
                let trimmed = strip_comment(raw).trim();
                if trimmed.eq_ignore_ascii_case(end_tag) {
                    return Ok(out);
                }
                if !trimmed.is_empty() {
                    out.push(trimmed);
                }
            }
            None => {
                return Err(InputError::Parse {
                    line: start_line + 1,
                    message: format!("unterminated block, expected '{end_tag}'"),
                })
            }
        }
    }
}

fn parse_family_block(block: &[&str], start_line: usize) -> Result<RawFamily, InputError> {
    let mut shape = None;
    let mut n_vertices = 4;
    let mut kappa = f64::INFINITY;
    let mut mean_normal = [0.0, 0.0, 1.0];
    let mut radius_dist = None;
    let mut radius_params = Vec::new();
    let mut region = "whole".to_string();
    let mut p32_target = 0.0;
    let mut aspect_ratio = 1.0;
    let mut probability = 0.0;

    for line in block {
        let Some((key, value)) = line.split_once(':') else {
            return Err(InputError::Parse {
                line: start_line + 1,
                message: format!("expected 'keyword: value' in family block, got '{line}'"),
            });
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "shape" => shape = Some(value.to_string()),
            "nVertices" => n_vertices = ws_usize(value).map(|(_, v)| v).unwrap_or(4),
            "kappa" => {
                kappa = if value.eq_ignore_ascii_case("inf") {
                    f64::INFINITY
                } else {
                    ws_f64(value).map(|(_, v)| v).unwrap_or(f64::INFINITY)
                }
            }
            "meanNormal" => {
                let v = parse_f64_list(value);
                if v.len() == 3 {
                    mean_normal = [v[0], v[1], v[2]];
                }
            }
            "radiusDist" => radius_dist = Some(value.to_string()),
            "radiusParams" => radius_params = parse_f64_list(value),
            "region" => region = value.to_string(),
            "p32Target" => p32_target = ws_f64(value).map(|(_, v)| v).unwrap_or(0.0),
            "aspectRatio" => aspect_ratio = ws_f64(value).map(|(_, v)| v).unwrap_or(1.0),
            "probability" => probability = ws_f64(value).map(|(_, v)| v).unwrap_or(0.0),
            _ => {}
        }
    }

    Ok(RawFamily {
        shape: shape.ok_or(InputError::MissingKeyword("shape"))?,
        n_vertices,
        kappa,
        mean_normal,
        radius_dist: radius_dist.ok_or(InputError::MissingKeyword("radiusDist"))?,
        radius_params,
        region,
        p32_target,
        aspect_ratio,
        probability,
    })
}

fn parse_scalar_f64(value: &str, line_no: usize) -> Result<f64, InputError> {
    ws_f64(value).map(|(_, v)| v).map_err(|_| InputError::Parse {
        line: line_no + 1,
        message: format!("expected a number, got '{value}'"),
    })
}

fn parse_scalar_u64(value: &str, line_no: usize) -> Result<u64, InputError> {
    value.trim().parse().map_err(|_| InputError::Parse {
        line: line_no + 1,
        message: format!("expected an integer, got '{value}'"),
    })
}

fn parse_scalar_usize(value: &str, line_no: usize) -> Result<usize, InputError> {
    value.trim().parse().map_err(|_| InputError::Parse {
        line: line_no + 1,
        message: format!("expected an integer, got '{value}'"),
    })
}

fn parse_scalar_bool(value: &str, line_no: usize) -> Result<bool, InputError> {
    Ok(parse_scalar_u64(value, line_no)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        h: 0.1
        seed: 42
        domainSize: 1.0 1.0 1.0
        nFamEll: 0
        nFamRect: 1
        nPoly: 1
        stopCondition: 0
        famProb: 1.0
        boundaryFaces: 1 1 1 1 1 1

        beginFamily
        shape: rectangle
        nVertices: 4
        kappa: inf
        meanNormal: 0 0 1
        radiusDist: constant
        radiusParams: 0.15
        region: whole
        p32Target: 0.0
        aspectRatio: 1.0
        endFamily
    "#;

    #[test]
    fn parses_scalars_and_one_family() {
        let parsed = parse(SAMPLE).unwrap();
        assert_eq!(parsed.config.h, 0.1);
        assert_eq!(parsed.config.seed, 42);
        assert_eq!(parsed.config.domain_size, [1.0, 1.0, 1.0]);
        assert_eq!(parsed.families.len(), 1);
        assert_eq!(parsed.families[0].kind, ShapeKind::Rectangle);
        assert_eq!(parsed.families[0].probability, 1.0);
    }

    #[test]
    fn missing_h_is_an_error() {
        let text = "domainSize: 1 1 1\n";
        assert!(matches!(parse(text), Err(InputError::MissingKeyword("h"))));
    }

    #[test]
    fn parses_user_rectangle_block() {
        let text = r#"
            h: 0.1
            domainSize: 1 1 1
            beginUserRect
            -0.1 -0.1 0  0.1 -0.1 0  0.1 0.1 0  -0.1 0.1 0
            endUserRect
        "#;
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.user_fractures.len(), 1);
        assert_eq!(parsed.user_fractures[0].vertices.len(), 4);
        assert_eq!(parsed.user_fractures[0].kind, UserFractureKind::Rectangle);
    }
}
