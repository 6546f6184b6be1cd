//! Area-type detection from broad probe queries.

use std::collections::BTreeSet;

use civic_priority_core::{
    AreaType, Coordinate, FacilityQueryClient, PlaceQueryError, RateLimiter, RawPlace, Unthrottled,
};
use log::{debug, warn};

/// Generic directory categories used to estimate facility density.
pub const DEFAULT_PROBES: [&str; 3] = ["establishment", "point_of_interest", "store"];

/// Radius of each probe query, in metres.
pub const DEFAULT_PROBE_RADIUS_M: u32 = 1000;

/// Tags whose presence suggests an urban centre.
pub const URBAN_INDICATORS: [&str; 6] = ["mall", "bank", "atm", "hospital", "school", "government"];

/// Indicators needed to upgrade a suburban area to urban.
const URBAN_UPGRADE_THRESHOLD: usize = 4;

/// What the probes revealed about the surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaProfile {
    /// Detected area type.
    pub area_type: AreaType,
    /// Total number of places returned by successful probes.
    pub density: usize,
    /// Distinct directory tags seen across probes.
    pub tags: BTreeSet<String>,
}

impl AreaProfile {
    /// Profile used when no probe succeeded.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            area_type: AreaType::Unknown,
            density: 0,
            tags: BTreeSet::new(),
        }
    }
}

/// Classify a coordinate's surroundings from probe density.
///
/// Probes run sequentially, each gated by the detector's [`RateLimiter`].
/// A failed probe is logged and skipped; if every probe fails the detector
/// reports [`AreaType::Unknown`] rather than aborting the calculation.
#[derive(Debug)]
pub struct AreaTypeDetector<L = Unthrottled> {
    probes: Vec<String>,
    radius_m: u32,
    limiter: L,
}

impl Default for AreaTypeDetector<Unthrottled> {
    fn default() -> Self {
        Self::new(Unthrottled)
    }
}

impl<L: RateLimiter> AreaTypeDetector<L> {
    /// Create a detector with the standard probes, paced by `limiter`.
    #[must_use]
    pub fn new(limiter: L) -> Self {
        Self {
            probes: DEFAULT_PROBES.iter().map(|probe| (*probe).to_owned()).collect(),
            radius_m: DEFAULT_PROBE_RADIUS_M,
            limiter,
        }
    }

    /// Replace the probe categories.
    #[must_use]
    pub fn with_probes(mut self, probes: &[&str]) -> Self {
        self.probes = probes.iter().map(|probe| (*probe).to_owned()).collect();
        self
    }

    /// Replace the probe radius.
    #[must_use]
    pub const fn with_radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Probe categories in query order.
    #[must_use]
    pub fn probes(&self) -> &[String] {
        &self.probes
    }

    /// Run the probes around `origin` and classify the result.
    #[must_use]
    pub fn detect<C: FacilityQueryClient + ?Sized>(
        &self,
        client: &C,
        origin: &Coordinate,
    ) -> AreaProfile {
        let mut density = 0_usize;
        let mut tags = BTreeSet::new();
        let mut succeeded = 0_usize;
        for probe in &self.probes {
            match self.run_probe(client, origin, probe) {
                Ok(places) => {
                    succeeded += 1;
                    density += places.len();
                    tags.extend(places.into_iter().flat_map(|place| place.types));
                }
                Err(err) => warn!("area probe '{probe}' failed: {err}"),
            }
        }
        if succeeded == 0 {
            warn!("every area probe failed; area type is unknown");
            return AreaProfile::unknown();
        }
        let area_type = classify_area(density, &tags);
        debug!("area probes found {density} places; classified as {area_type}");
        AreaProfile {
            area_type,
            density,
            tags,
        }
    }

    fn run_probe<C: FacilityQueryClient + ?Sized>(
        &self,
        client: &C,
        origin: &Coordinate,
        probe: &str,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        self.limiter.acquire()?;
        client.nearby(origin, probe, self.radius_m)
    }
}

/// Map probe density and tags to an [`AreaType`].
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use civic_priority_core::AreaType;
/// use civic_priority_scorer::classify_area;
///
/// assert_eq!(classify_area(85, &BTreeSet::new()), AreaType::DenseUrban);
/// assert_eq!(classify_area(3, &BTreeSet::new()), AreaType::Rural);
/// ```
#[must_use]
pub fn classify_area(density: usize, tags: &BTreeSet<String>) -> AreaType {
    match density {
        d if d >= 80 => AreaType::DenseUrban,
        d if d >= 40 => AreaType::Urban,
        d if d >= 15 => {
            if urban_indicator_count(tags) >= URBAN_UPGRADE_THRESHOLD {
                AreaType::Urban
            } else {
                AreaType::Suburban
            }
        }
        _ => AreaType::Rural,
    }
}

/// Count the [`URBAN_INDICATORS`] mentioned by any tag.
fn urban_indicator_count(tags: &BTreeSet<String>) -> usize {
    URBAN_INDICATORS
        .iter()
        .filter(|indicator| tags.iter().any(|tag| tag.contains(*indicator)))
        .count()
}
