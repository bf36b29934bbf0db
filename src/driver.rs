//! Insertion driver (§4.I): the state machine that orchestrates
//! draw -> truncate -> FRAM -> commit and terminates per §4.I's predicate.
//! This is the only module that mutates the accepted-polygon arena, the
//! intersection arena, and per-family statistics — every other component
//! is a pure function of its inputs.

use dfn_math::Point;

use crate::cdf::Cdf;
use crate::cluster::{self, ClusterResult};
use crate::config::Config;
use crate::error::DfnError;
use crate::family::ShapeFamily;
use crate::fracture::{FractureId, Polygon};
use crate::fram::{self, RejectCode};
use crate::hotkey::HaltSignal;
use crate::intersection::{IntersectionArena, IntersectionRecord, TriplePoint};
use crate::sampler::{self, Distributions, Rng64};
use crate::shape;
use crate::stats::Stats;

/// A user-defined fracture awaiting insertion, tagged by the kind that
/// decides both its insertion order (§4.I) and the negative family label
/// written to `radii_All.dat` (§6: "family# = -1 user rectangle, 0 user
/// ellipse").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFractureKind {
    ByCoord,
    Rectangle,
    Ellipse,
}

pub struct UserFracture {
    pub kind: UserFractureKind,
    pub vertices: Vec<Point>,
}

impl UserFractureKind {
    fn family_label(self) -> i64 {
        match self {
            UserFractureKind::ByCoord => -3,
            UserFractureKind::Rectangle => -1,
            UserFractureKind::Ellipse => -2,
        }
    }
}

/// Interface for the optional sub-polygon-boundary extraction named in
/// §1's Non-goals. Modeled here (§9 design note) so the ordering
/// constraint against `remove_small`/cluster analysis stays visible in
/// code even though the geometry is not implemented.
pub trait PolygonBoundary {
    fn extract(&mut self, accepted: &mut Vec<Polygon>, arena: &mut IntersectionArena);
}

/// Default no-op implementation; real sub-polygon extraction is a
/// downstream collaborator per §1.
pub struct NoopPolygonBoundary;

impl PolygonBoundary for NoopPolygonBoundary {
    fn extract(&mut self, _accepted: &mut Vec<Polygon>, _arena: &mut IntersectionArena) {}
}

/// Intensity aggregates reported both before and after isolated-fracture
/// removal (§6).
#[derive(Debug, Clone, Copy, Default)]
pub struct Intensity {
    pub p30: f64,
    pub p32: f64,
}

/// Everything §6 says the core must expose after termination.
pub struct DriverOutput {
    pub accepted: Vec<Polygon>,
    pub arena: IntersectionArena,
    pub families: Vec<ShapeFamily>,
    pub stats: Stats,
    pub resolved_seed: u64,
    pub cluster: ClusterResult,
    pub intensity_before: Intensity,
    pub intensity_after: Intensity,
}

pub struct Driver {
    cfg: Config,
    families: Vec<ShapeFamily>,
    user_fractures: Vec<UserFracture>,
    accepted: Vec<Polygon>,
    arena: IntersectionArena,
    stats: Stats,
    resolved_seed: u64,
}

impl Driver {
    pub fn new(cfg: Config, families: Vec<ShapeFamily>, user_fractures: Vec<UserFracture>) -> Driver {
        Driver {
            cfg,
            families,
            user_fractures,
            accepted: Vec::new(),
            arena: IntersectionArena::new(),
            stats: Stats::default(),
            resolved_seed: 0,
        }
    }

    /// Resolves `seed == 0` to a time-based value (§5), reporting it so
    /// the summary file and log never show the literal `0`.
    fn resolve_seed(&self) -> u64 {
        if self.cfg.seed != 0 {
            return self.cfg.seed;
        }
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    }

    pub fn run(mut self, halt: &mut dyn HaltSignal) -> Result<DriverOutput, DfnError> {
        self.resolved_seed = self.resolve_seed();
        tracing::info!(seed = self.resolved_seed, "resolved seed");
        let mut rng = Rng64::from_seed(self.resolved_seed);

        Distributions::pregenerate(&mut rng, &mut self.families, &self.cfg);

        self.insert_user_fractures(&mut rng);

        let mut cdf = Cdf::build(&self.families);
        let mut user_halted = false;

        loop {
            if halt.poll() {
                user_halted = true;
                break;
            }
            if self.terminated() {
                break;
            }
            let Some(family_idx) = cdf.select(rng.uniform01()) else {
                break;
            };

            let mut rejects_this_attempt = 0u32;
            let mut committed = false;
            for _attempt in 0..=self.cfg.rejects_per_fracture {
                let radius = self.families[family_idx]
                    .next_radius()
                    .unwrap_or_else(|| sampler::sample_radius(&mut rng, &self.families[family_idx].radius));
                let orientation = self.families[family_idx].orientation;
                let normal = sampler::sample_orientation(&mut rng, &orientation);
                let region = self.families[family_idx].region;
                let center = sampler::sample_translation(&mut rng, &self.cfg, region);

                let mut candidate = shape::build_candidate(&self.families[family_idx], radius, normal, center);

                match crate::truncate::truncate(&mut candidate, region, &self.cfg) {
                    crate::truncate::TruncateOutcome::Outside => {
                        self.stats.reject_reasons.outside += 1;
                        self.stats.rejected += 1;
                        self.stats.record_retranslation();
                        rejects_this_attempt += 1;
                        continue;
                    }
                    crate::truncate::TruncateOutcome::Kept { changed } => {
                        if changed {
                            self.stats.record_truncation();
                        }
                    }
                }

                match fram::check(&candidate, &self.accepted, &self.arena, &self.cfg) {
                    Ok(accept) => {
                        self.commit(candidate, accept, family_idx, region);
                        self.stats.record_accept(rejects_this_attempt);
                        committed = true;
                        break;
                    }
                    Err(code) => {
                        if self.cfg.print_reject_reasons {
                            tracing::debug!(reason = %code, family = family_idx, "rejected candidate");
                        }
                        self.stats.record_reject(code);
                        self.stats.record_retranslation();
                        rejects_this_attempt += 1;
                    }
                }
            }

            if !committed {
                self.families[family_idx].rejected_count += 1;
            }

            if self.accepted.len() % 200 == 0 && !self.accepted.is_empty() {
                tracing::info!(
                    accepted = self.stats.accepted,
                    rejected = self.stats.rejected,
                    retranslated = self.stats.retranslated,
                    "progress heartbeat"
                );
            }

            if self.families[family_idx].current_p32 >= self.families[family_idx].p32_target
                && self.cfg.stop_condition == crate::config::StopCondition::P32
                && !self.families[family_idx].complete
            {
                self.families[family_idx].complete = true;
                cdf.complete_family(family_idx, &self.families, &self.cfg);
            }
        }

        if !user_halted {
            tracing::info!("insertion loop reached its termination predicate");
        } else {
            tracing::info!("insertion loop halted by user");
        }

        let p30_before = self.accepted.len() as f64 / self.cfg.domain_volume();
        let p32_before: f64 = self
            .accepted
            .iter()
            .map(|p| 2.0 * p.area() / self.cfg.domain_volume())
            .sum();

        self.remove_small();

        let mut boundary_extractor = NoopPolygonBoundary;
        if self.cfg.polygon_boundary_flag {
            boundary_extractor.extract(&mut self.accepted, &mut self.arena);
        }

        let cluster = cluster::analyze(&self.accepted, &self.arena, &self.cfg);

        if cluster.final_fractures.is_empty() {
            return Err(DfnError::NoConnectivity {
                attempted_boundary_faces: self.cfg.boundary_faces,
                remediation: "increase family intensity, shrink the domain, or set ignoreBoundaryFaces",
            });
        }

        let p30_after = cluster.final_fractures.len() as f64 / self.cfg.domain_volume();
        let p32_after: f64 = cluster
            .final_fractures
            .iter()
            .map(|id| 2.0 * self.accepted[id.0].area() / self.cfg.domain_volume())
            .sum();

        Ok(DriverOutput {
            accepted: self.accepted,
            arena: self.arena,
            families: self.families,
            stats: self.stats,
            resolved_seed: self.resolved_seed,
            cluster,
            intensity_before: Intensity {
                p30: p30_before,
                p32: p32_before,
            },
            intensity_after: Intensity {
                p30: p30_after,
                p32: p32_after,
            },
        })
    }

    /// Inserts user-defined fractures ahead of the stochastic loop
    /// (§4.I): polygons-by-coord always first, then rectangles-then-
    /// ellipses or ellipses-then-rectangles per
    /// `insert_user_rectangles_first`. They run under the same FRAM
    /// predicates but are never retried on rejection (their coordinates
    /// are fixed) and never counted against any family quota.
    fn insert_user_fractures(&mut self, rng: &mut Rng64) {
        let _ = rng; // reserved: user fracture insertion order is deterministic, no draws needed.
        let by_coord: Vec<usize> = self
            .user_fractures
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == UserFractureKind::ByCoord)
            .map(|(i, _)| i)
            .collect();
        let rects: Vec<usize> = self
            .user_fractures
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == UserFractureKind::Rectangle)
            .map(|(i, _)| i)
            .collect();
        let ellipses: Vec<usize> = self
            .user_fractures
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == UserFractureKind::Ellipse)
            .map(|(i, _)| i)
            .collect();

        let mut order = by_coord;
        if self.cfg.insert_user_rectangles_first {
            order.extend(rects);
            order.extend(ellipses);
        } else {
            order.extend(ellipses);
            order.extend(rects);
        }

        for idx in order {
            let fracture = &self.user_fractures[idx];
            let mut candidate = shape::build_user_polygon(fracture.kind.family_label(), fracture.vertices.clone());

            match crate::truncate::truncate(&mut candidate, crate::family::RegionSpec::WholeDomain, &self.cfg) {
                crate::truncate::TruncateOutcome::Outside => {
                    self.stats.reject_reasons.outside += 1;
                    self.stats.rejected += 1;
                    continue;
                }
                crate::truncate::TruncateOutcome::Kept { changed } => {
                    if changed {
                        self.stats.record_truncation();
                    }
                }
            }

            match fram::check(&candidate, &self.accepted, &self.arena, &self.cfg) {
                Ok(accept) => {
                    self.commit_user(candidate, accept);
                    self.stats.record_accept(0);
                }
                Err(code) => {
                    if self.cfg.print_reject_reasons {
                        tracing::debug!(reason = %code, "rejected user fracture");
                    }
                    self.stats.record_reject(code);
                }
            }
        }
    }

    fn terminated(&self) -> bool {
        match self.cfg.stop_condition {
            crate::config::StopCondition::NPoly => self.stats.accepted >= self.cfg.n_poly,
            crate::config::StopCondition::P32 => self.families.iter().all(|f| f.complete),
        }
    }

    fn commit(
        &mut self,
        candidate: Polygon,
        accept: fram::FramAccept,
        family_idx: usize,
        region: crate::family::RegionSpec,
    ) {
        let area = candidate.area();
        let region_volume = self.families[family_idx].region_volume(&self.cfg);
        let _ = region;
        self.families[family_idx].current_p32 += 2.0 * area / region_volume;
        self.families[family_idx].accepted_count += 1;
        self.commit_common(candidate, accept);
    }

    fn commit_user(&mut self, candidate: Polygon, accept: fram::FramAccept) {
        self.commit_common(candidate, accept);
    }

    /// Appends the candidate and its new intersection/triple-point records
    /// atomically (§4.E step 5), keeping every adjacency list in sync so
    /// the §3 invariant ("both polygons' adjacency lists contain the
    /// record's id") holds immediately after commit.
    fn commit_common(&mut self, mut candidate: Polygon, accept: fram::FramAccept) {
        let new_id = FractureId(self.accepted.len());

        let mut new_ids = Vec::with_capacity(accept.new_intersections.len());
        for new_int in &accept.new_intersections {
            let record = IntersectionRecord {
                fracture_a: new_id,
                fracture_b: new_int.other,
                endpoints: new_int.endpoints,
                original_length: new_int.original_length,
                triple_point_ids: Vec::new(),
            };
            if new_int.shortened {
                self.stats
                    .record_shortened_intersection(new_int.original_length, record.length());
            }
            let rid = self.arena.push_record(record);
            self.accepted[new_int.other.0].intersection_ids.push(rid);
            candidate.intersection_ids.push(rid);
            new_ids.push(rid);
        }

        for tc in &accept.triple_candidates {
            let new_rid = new_ids[tc.new_intersection_index];
            // The triple point's third parent is the candidate's own
            // intersection with the far fracture of `existing_record`,
            // which (if it exists) was discovered as a separate new
            // intersection in this same candidate's broadphase pass.
            let Some(far_rid) = accept
                .new_intersections
                .iter()
                .position(|ni| ni.other == tc.far_fracture)
                .map(|idx| new_ids[idx])
            else {
                continue;
            };
            let tp = TriplePoint {
                point: tc.point,
                parent_intersections: [new_rid, tc.existing_record, far_rid],
            };
            let tp_id = self.arena.push_triple_point(tp);
            self.arena.record_mut(new_rid).triple_point_ids.push(tp_id);
            self.arena.record_mut(tc.existing_record).triple_point_ids.push(tp_id);
            self.arena.record_mut(far_rid).triple_point_ids.push(tp_id);
        }

        self.accepted.push(candidate);
    }

    /// Radius-threshold cull (§9 Supplemented Features), run *before*
    /// cluster analysis and before `polygonBoundaryFlag` extraction
    /// (Open Question in §9 of `spec.md`: preserve this order). Removing
    /// a fracture drops its intersection records and any triple points
    /// that depended on them, then reindexes every remaining id.
    fn remove_small(&mut self) {
        let threshold = self.cfg.remove_fractures_less_than;
        if threshold <= 0.0 {
            return;
        }

        let keep: Vec<bool> = self
            .accepted
            .iter()
            .map(|p| p.x_radius.max(p.y_radius) >= threshold)
            .collect();
        if keep.iter().all(|&k| k) {
            return;
        }

        let mut remap = vec![None; self.accepted.len()];
        let mut next = 0usize;
        for (i, &k) in keep.iter().enumerate() {
            if k {
                remap[i] = Some(FractureId(next));
                next += 1;
            }
        }

        let mut new_accepted = Vec::with_capacity(next);
        for (i, mut poly) in std::mem::take(&mut self.accepted).into_iter().enumerate() {
            if keep[i] {
                poly.intersection_ids.clear();
                new_accepted.push(poly);
            }
        }

        let mut new_arena = IntersectionArena::new();
        let mut record_remap: std::collections::HashMap<usize, crate::intersection::IntersectionId> =
            std::collections::HashMap::new();
        for (old_idx, record) in self.arena.records().iter().enumerate() {
            let (Some(a), Some(b)) = (remap[record.fracture_a.0], remap[record.fracture_b.0]) else {
                continue;
            };
            let new_record = IntersectionRecord {
                fracture_a: a,
                fracture_b: b,
                endpoints: record.endpoints,
                original_length: record.original_length,
                triple_point_ids: Vec::new(),
            };
            let new_id = new_arena.push_record(new_record);
            record_remap.insert(old_idx, new_id);
            new_accepted[a.0].intersection_ids.push(new_id);
            new_accepted[b.0].intersection_ids.push(new_id);
        }

        for tp in self.arena.triple_points() {
            let mapped: Vec<crate::intersection::IntersectionId> = tp
                .parent_intersections
                .iter()
                .filter_map(|id| record_remap.get(&id.0).copied())
                .collect();
            if mapped.len() < 3 {
                continue; // One parent record was dropped; the triple point no longer holds.
            }
            let tp_id = new_arena.push_triple_point(TriplePoint {
                point: tp.point,
                parent_intersections: [mapped[0], mapped[1], mapped[2]],
            });
            for rid in &mapped {
                new_arena.record_mut(*rid).triple_point_ids.push(tp_id);
            }
        }

        self.accepted = new_accepted;
        self.arena = new_arena;
    }
}
