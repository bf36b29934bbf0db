//! Per-run statistics and rejection accounting (§3 "Statistics block", §4.F).

/// Disjoint rejection-reason tally. The original C++ counts `closeToNode`
/// inside `closeToEdge` and subtracts at the end; representing each
/// predicate as its own enum variant up front (§9 design note) keeps these
/// counts disjoint from the first increment.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectTally {
    pub short_intersection: u64,
    pub close_to_node: u64,
    pub close_to_edge: u64,
    pub close_point_to_edge: u64,
    pub outside: u64,
    pub triple: u64,
    pub inter_close_to_inter: u64,
}

impl RejectTally {
    pub fn total(&self) -> u64 {
        self.short_intersection
            + self.close_to_node
            + self.close_to_edge
            + self.close_point_to_edge
            + self.outside
            + self.triple
            + self.inter_close_to_inter
    }
}

#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub accepted: u64,
    pub rejected: u64,
    pub retranslated: u64,
    pub truncated: u64,

    pub reject_reasons: RejectTally,

    /// One entry per attempted insertion slot: the number of rejections
    /// that preceded that slot's eventual acceptance (or the cap-out that
    /// dropped the candidate entirely).
    pub rejects_per_attempt: Vec<u32>,

    /// Running count of intersections that were shortened (rather than
    /// rejected) to restore `h` clearance against a pre-existing
    /// intersection, and the total length discarded / retained in doing
    /// so (§4.E, intersection-close-to-intersection predicate).
    pub intersections_shortened: u64,
    pub discarded_length: f64,
    pub original_length_total: f64,
}

impl Stats {
    pub fn record_accept(&mut self, rejects_this_attempt: u32) {
        self.accepted += 1;
        self.rejects_per_attempt.push(rejects_this_attempt);
    }

    pub fn record_reject(&mut self, reason: super::fram::RejectCode) {
        self.rejected += 1;
        use super::fram::RejectCode::*;
        match reason {
            Accept => {}
            Outside => self.reject_reasons.outside += 1,
            ShortIntersection => self.reject_reasons.short_intersection += 1,
            CloseToNode => self.reject_reasons.close_to_node += 1,
            CloseToEdge => self.reject_reasons.close_to_edge += 1,
            ClosePointToEdge => self.reject_reasons.close_point_to_edge += 1,
            InterCloseToInter => self.reject_reasons.inter_close_to_inter += 1,
            Triple => self.reject_reasons.triple += 1,
        }
    }

    pub fn record_retranslation(&mut self) {
        self.retranslated += 1;
    }

    pub fn record_truncation(&mut self) {
        self.truncated += 1;
    }

    pub fn record_shortened_intersection(&mut self, original_length: f64, new_length: f64) {
        self.intersections_shortened += 1;
        self.discarded_length += original_length - new_length;
        self.original_length_total += original_length;
    }
}
