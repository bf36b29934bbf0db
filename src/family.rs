//! Shape-family parameterization (§3 "Shape family").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Ellipse,
    Rectangle,
}

/// Radius distribution, each truncated to `[rmin, rmax]` except `Constant`.
#[derive(Debug, Clone, Copy)]
pub enum RadiusDistribution {
    LogNormal { mu: f64, sigma: f64, rmin: f64, rmax: f64 },
    PowerLaw { alpha: f64, rmin: f64, rmax: f64 },
    Exponential { lambda: f64, rmin: f64, rmax: f64 },
    Constant { radius: f64 },
}

impl RadiusDistribution {
    pub fn rmin(&self) -> f64 {
        match *self {
            RadiusDistribution::LogNormal { rmin, .. } => rmin,
            RadiusDistribution::PowerLaw { rmin, .. } => rmin,
            RadiusDistribution::Exponential { rmin, .. } => rmin,
            RadiusDistribution::Constant { radius } => radius,
        }
    }

    pub fn rmax(&self) -> f64 {
        match *self {
            RadiusDistribution::LogNormal { rmax, .. } => rmax,
            RadiusDistribution::PowerLaw { rmax, .. } => rmax,
            RadiusDistribution::Exponential { rmax, .. } => rmax,
            RadiusDistribution::Constant { radius } => radius,
        }
    }
}

/// Orientation distribution about a mean normal: Fisher with concentration
/// `kappa`, or a fixed deterministic normal when `kappa` is infinite.
#[derive(Debug, Clone, Copy)]
pub struct OrientationDistribution {
    pub mean_normal: [f64; 3],
    pub kappa: f64,
}

impl OrientationDistribution {
    pub fn is_deterministic(&self) -> bool {
        self.kappa.is_infinite()
    }
}

/// Which spatial region a family samples positions and tracks P32 within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSpec {
    WholeDomain,
    Layer(usize),
    Region(usize),
}

#[derive(Debug, Clone)]
pub struct ShapeFamily {
    pub index: usize,
    pub kind: ShapeKind,
    /// Vertex count for ellipse discretization (4 for rectangles).
    pub n_vertices: usize,
    pub orientation: OrientationDistribution,
    pub radius: RadiusDistribution,
    pub region: RegionSpec,
    pub p32_target: f64,
    /// Probability weight at the start of the run (before any family
    /// completes and is pulled from the CDF).
    pub probability: f64,

    /// Half-length ratio for rectangles (x/y); unused for ellipses, which
    /// are circular in their local frame (x-radius == y-radius == drawn
    /// radius). Kept distinct from `kind` so a future elongated-ellipse
    /// family could reuse this field.
    pub aspect_ratio: f64,

    /// Pre-generated, sorted (descending) radii list built by
    /// [`crate::sampler::Distributions::pregenerate`].
    pub radii_list: Vec<f64>,
    pub radii_list_cursor: usize,

    pub current_p32: f64,
    pub complete: bool,

    pub accepted_count: u64,
    pub rejected_count: u64,
    pub expected_count: u64,
}

impl ShapeFamily {
    pub fn region_volume(
        &self,
        cfg: &crate::config::Config,
    ) -> f64 {
        match self.region {
            RegionSpec::WholeDomain => cfg.domain_volume(),
            RegionSpec::Layer(i) => cfg.layers[i].volume(cfg.domain_size[0], cfg.domain_size[1]),
            RegionSpec::Region(i) => cfg.regions[i].volume(),
        }
    }

    /// Next radius off the pre-generated list, or `None` once exhausted.
    pub fn next_radius(&mut self) -> Option<f64> {
        let r = self.radii_list.get(self.radii_list_cursor).copied();
        if r.is_some() {
            self.radii_list_cursor += 1;
        }
        r
    }
}
