//! Intersection records and triple points (§3).

use dfn_math::Point;

use crate::fracture::FractureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntersectionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriplePointId(pub usize);

/// An unordered pair of fracture ids plus the clipped segment of their
/// mutual intersection.
#[derive(Debug, Clone)]
pub struct IntersectionRecord {
    pub fracture_a: FractureId,
    pub fracture_b: FractureId,
    pub endpoints: [Point; 2],
    /// Length before any FRAM-driven shortening; kept for reporting even
    /// after `endpoints` is shrunk to restore clearance.
    pub original_length: f64,
    pub triple_point_ids: Vec<TriplePointId>,
}

impl IntersectionRecord {
    pub fn length(&self) -> f64 {
        self.endpoints[0].distance(self.endpoints[1])
    }

    pub fn other(&self, id: FractureId) -> FractureId {
        if id == self.fracture_a {
            self.fracture_b
        } else {
            self.fracture_a
        }
    }

    pub fn involves(&self, id: FractureId) -> bool {
        self.fracture_a == id || self.fracture_b == id
    }
}

/// A point where three accepted fractures pairwise intersect.
#[derive(Debug, Clone)]
pub struct TriplePoint {
    pub point: Point,
    /// The three intersection records whose segments meet here. Their six
    /// fracture ids must form exactly three distinct ids (§3 invariant).
    pub parent_intersections: [IntersectionId; 3],
}

/// Owns the committed intersection records and triple points for the
/// duration of a run. Represented as two flat arenas indexed by id, per
/// the §9 design note on avoiding polygon/intersection reference cycles.
#[derive(Debug, Default)]
pub struct IntersectionArena {
    records: Vec<IntersectionRecord>,
    triple_points: Vec<TriplePoint>,
}

impl IntersectionArena {
    pub fn new() -> IntersectionArena {
        IntersectionArena::default()
    }

    pub fn push_record(&mut self, record: IntersectionRecord) -> IntersectionId {
        let id = IntersectionId(self.records.len());
        self.records.push(record);
        id
    }

    pub fn push_triple_point(&mut self, tp: TriplePoint) -> TriplePointId {
        let id = TriplePointId(self.triple_points.len());
        self.triple_points.push(tp);
        id
    }

    pub fn record(&self, id: IntersectionId) -> &IntersectionRecord {
        &self.records[id.0]
    }

    pub fn record_mut(&mut self, id: IntersectionId) -> &mut IntersectionRecord {
        &mut self.records[id.0]
    }

    pub fn triple_point(&self, id: TriplePointId) -> &TriplePoint {
        &self.triple_points[id.0]
    }

    pub fn records(&self) -> &[IntersectionRecord] {
        &self.records
    }

    pub fn triple_points(&self) -> &[TriplePoint] {
        &self.triple_points
    }

    pub fn records_on(&self, fracture: FractureId) -> impl Iterator<Item = IntersectionId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.involves(fracture))
            .map(|(i, _)| IntersectionId(i))
    }

    pub fn triple_points_on(&self, intersection: IntersectionId) -> impl Iterator<Item = &TriplePoint> {
        self.triple_points
            .iter()
            .filter(move |tp| tp.parent_intersections.contains(&intersection))
    }
}
