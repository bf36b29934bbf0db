//! Output writer (§6 "Emitted state" / "Human-readable summary file").
//! Produces `DFN_output.txt`, `radii/radii_All.dat`, and the `polys/`
//! folder stub. Full mesh/polygon-dump file formats remain a downstream
//! collaborator's job per §1's Non-goals; this module only creates the
//! folder they would write into.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::driver::DriverOutput;

/// Creates `<output>/`, `<output>/radii/`, and `<output>/polys/` if
/// missing (§6: "created if missing"), then writes the summary file and,
/// when `output_all_radii` is set, the radii dump.
pub fn write_all(output_dir: &str, result: &DriverOutput, output_all_radii: bool) -> io::Result<()> {
    let root = Path::new(output_dir);
    fs::create_dir_all(root)?;
    fs::create_dir_all(root.join("radii"))?;
    fs::create_dir_all(root.join("polys"))?;

    write_summary(&root.join("DFN_output.txt"), result)?;
    if output_all_radii {
        write_radii_all(&root.join("radii").join("radii_All.dat"), result)?;
    }
    Ok(())
}

fn write_summary(path: &Path, result: &DriverOutput) -> io::Result<()> {
    let mut out = String::new();

    out.push_str("DFN generation summary\n");
    out.push_str(&format!("resolved seed: {}\n\n", result.resolved_seed));

    out.push_str(&format!(
        "accepted fractures (pre-isolation-removal): {}\n",
        result.accepted.len()
    ));
    out.push_str(&format!("  P30: {:.6}\n", result.intensity_before.p30));
    out.push_str(&format!("  P32: {:.6}\n\n", result.intensity_before.p32));

    out.push_str(&format!(
        "final fractures (post-isolation-removal): {}\n",
        result.cluster.final_fractures.len()
    ));
    out.push_str(&format!("  P30: {:.6}\n", result.intensity_after.p30));
    out.push_str(&format!("  P32: {:.6}\n\n", result.intensity_after.p32));

    out.push_str("per-family breakdown:\n");
    for fam in &result.families {
        out.push_str(&format!(
            "  family {:>3}: accepted={:<6} rejected={:<6} P32={:.6} (target {:.6})\n",
            fam.index, fam.accepted_count, fam.rejected_count, fam.current_p32, fam.p32_target
        ));
    }
    out.push('\n');

    out.push_str("intersection statistics:\n");
    out.push_str(&format!("  count: {}\n", result.arena.records().len()));
    out.push_str(&format!(
        "  shortened: {}\n",
        result.stats.intersections_shortened
    ));
    out.push_str(&format!(
        "  discarded length: {:.6}\n",
        result.stats.discarded_length
    ));
    out.push_str(&format!("  triple points: {}\n\n", result.arena.triple_points().len()));

    let reasons = &result.stats.reject_reasons;
    out.push_str("rejection tally:\n");
    out.push_str(&format!("  shortIntersection: {}\n", reasons.short_intersection));
    out.push_str(&format!("  closeToNode: {}\n", reasons.close_to_node));
    out.push_str(&format!("  closeToEdge: {}\n", reasons.close_to_edge));
    out.push_str(&format!("  closePointToEdge: {}\n", reasons.close_point_to_edge));
    out.push_str(&format!("  outside: {}\n", reasons.outside));
    out.push_str(&format!("  triple: {}\n", reasons.triple));
    out.push_str(&format!("  interCloseToInter: {}\n", reasons.inter_close_to_inter));
    out.push_str(&format!("  total rejected: {}\n\n", result.stats.rejected));

    let intersection_node_count = result.arena.records().len() * 2;
    let triple_node_count = result.arena.triple_points().len();
    let lagrit_estimate = (intersection_node_count / 2).saturating_sub(triple_node_count);
    out.push_str(&format!("Lagrit Should Remove {} Nodes\n", lagrit_estimate));

    fs::write(path, out)
}

/// `radii_All.dat`: one `xRadius yRadius family#` row per draw.
/// `family# = -1` user rectangle, `-2` user ellipse, `-3` user
/// polygon-by-coordinate, non-negative for stochastic families (§6).
fn write_radii_all(path: &Path, result: &DriverOutput) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    for poly in &result.accepted {
        writeln!(f, "{} {} {}", poly.x_radius, poly.y_radius, poly.family)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterResult;
    use crate::fracture::FractureId;
    use crate::intersection::IntersectionArena;
    use crate::stats::Stats;

    fn empty_result() -> DriverOutput {
        DriverOutput {
            accepted: Vec::new(),
            arena: IntersectionArena::new(),
            families: Vec::new(),
            stats: Stats::default(),
            resolved_seed: 7,
            cluster: ClusterResult {
                group_ids: Vec::new(),
                final_fractures: vec![FractureId(0)],
            },
            intensity_before: Default::default(),
            intensity_after: Default::default(),
        }
    }

    #[test]
    fn write_all_creates_expected_tree() {
        let dir = std::env::temp_dir().join(format!("dfngen_test_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let result = empty_result();
        write_all(dir.to_str().unwrap(), &result, true).unwrap();

        assert!(dir.join("DFN_output.txt").exists());
        assert!(dir.join("radii").is_dir());
        assert!(dir.join("polys").is_dir());
        assert!(dir.join("radii").join("radii_All.dat").exists());

        let summary = fs::read_to_string(dir.join("DFN_output.txt")).unwrap();
        assert!(summary.contains("resolved seed: 7"));

        let _ = fs::remove_dir_all(&dir);
    }
}
