//! CDF selector (§4.G): chooses the next family to draw from by inverse-CDF
//! sampling over active families' probabilities, and removes families from
//! the CDF once they complete in P32 mode.

use crate::config::{Config, StopCondition};
use crate::family::ShapeFamily;

/// A dense cumulative-probability table over the currently active family
/// indices. Rebuilt whenever a family completes in P32 mode.
pub struct Cdf {
    /// Parallel to `active`: running cumulative probability, last entry
    /// normalized to 1.0.
    cumulative: Vec<f64>,
    /// Family indices still eligible to be drawn, in the same order as
    /// `cumulative`.
    active: Vec<usize>,
}

impl Cdf {
    /// Builds the initial table from each family's starting `probability`.
    /// `nPoly` mode never rebuilds this afterward (§4.G).
    pub fn build(families: &[ShapeFamily]) -> Cdf {
        let active: Vec<usize> = families
            .iter()
            .enumerate()
            .filter(|(_, f)| f.probability > 0.0)
            .map(|(i, _)| i)
            .collect();
        let mut cdf = Cdf {
            cumulative: Vec::new(),
            active,
        };
        cdf.rebuild(families);
        cdf
    }

    fn rebuild(&mut self, families: &[ShapeFamily]) {
        let total: f64 = self.active.iter().map(|&i| families[i].probability).sum();
        let mut acc = 0.0;
        self.cumulative = self
            .active
            .iter()
            .map(|&i| {
                acc += if total > 0.0 {
                    families[i].probability / total
                } else {
                    0.0
                };
                acc
            })
            .collect();
        if let Some(last) = self.cumulative.last_mut() {
            *last = 1.0;
        }
    }

    /// Removes `family_index` from the active set and redistributes its
    /// probability proportionally across survivors, per §4.G's P32-mode
    /// completion rule. A no-op in `nPoly` mode (the CDF "keeps...fixed").
    pub fn complete_family(&mut self, family_index: usize, families: &[ShapeFamily], cfg: &Config) {
        if cfg.stop_condition != StopCondition::P32 {
            return;
        }
        if let Some(pos) = self.active.iter().position(|&i| i == family_index) {
            self.active.remove(pos);
        }
        self.rebuild(families);
    }

    /// Inverse-CDF draw: returns `None` once every family has been removed
    /// (all complete, or none had positive probability to begin with).
    pub fn select(&self, u: f64) -> Option<usize> {
        if self.active.is_empty() {
            return None;
        }
        for (slot, &cum) in self.cumulative.iter().enumerate() {
            if u < cum {
                return Some(self.active[slot]);
            }
        }
        self.active.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
