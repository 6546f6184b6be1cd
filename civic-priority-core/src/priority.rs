//! Request and result types exchanged with the priority engine.
//!
//! Results are created fresh for every calculation and carry no identity;
//! storing them is the caller's concern.

use std::collections::BTreeMap;

use geo::Point;

use crate::location::LocationMeta;

/// Coarse classification of a coordinate's surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AreaType {
    /// City centre with very high facility density.
    DenseUrban,
    /// Built-up urban area.
    Urban,
    /// Residential outskirts.
    Suburban,
    /// Sparse surroundings.
    Rural,
    /// Density could not be determined.
    #[default]
    Unknown,
}

impl AreaType {
    /// Return the area type as a `snake_case` `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DenseUrban => "dense_urban",
            Self::Urban => "urban",
            Self::Suburban => "suburban",
            Self::Rural => "rural",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete priority band derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PriorityLevel {
    /// Score below 0.2.
    Minimal,
    /// Score in `0.2..0.4`.
    Low,
    /// Score in `0.4..0.6`.
    Medium,
    /// Score in `0.6..0.8`.
    High,
    /// Score of at least 0.8.
    Critical,
}

impl PriorityLevel {
    /// Map a score onto its band.
    ///
    /// # Examples
    /// ```
    /// use civic_priority_core::PriorityLevel;
    ///
    /// assert_eq!(PriorityLevel::from_score(0.8), PriorityLevel::Critical);
    /// assert_eq!(PriorityLevel::from_score(0.59), PriorityLevel::Medium);
    /// assert_eq!(PriorityLevel::from_score(f64::NAN), PriorityLevel::Minimal);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.8 => Self::Critical,
            s if s >= 0.6 => Self::High,
            s if s >= 0.4 => Self::Medium,
            s if s >= 0.2 => Self::Low,
            _ => Self::Minimal,
        }
    }

    /// Return the band as an upper-case `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified facility near the reported location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct FacilityCandidate {
    /// Display name.
    pub name: String,
    /// Directory identifier.
    pub external_id: String,
    /// Great-circle distance from the reported location, in metres.
    pub distance_m: f64,
    /// User rating, `0.0` when unreported.
    pub rating: f64,
    /// Directory category tags.
    pub types: Vec<String>,
    /// Short address, empty when unreported.
    pub vicinity: String,
    /// Position with `x = longitude`, `y = latitude`.
    pub location: Point<f64>,
    /// Whether the facility reported itself open.
    pub open_now: Option<bool>,
}

/// Scoring outcome for one facility type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct FacilityTypeAnalysis {
    /// Candidates that survived classification.
    pub count: usize,
    /// Up to five nearest candidates, closest first.
    pub top_candidates: Vec<FacilityCandidate>,
    /// Distance to the nearest candidate, if any.
    pub nearest_distance_m: Option<f64>,
    /// Configured importance of the type.
    pub weight: f64,
    /// Type score in `0.0..=1.0`.
    pub score: f64,
    /// Radius searched for this type, in metres.
    pub search_radius_used: u32,
    /// Note describing an isolated query failure.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl FacilityTypeAnalysis {
    /// Analysis for a type with no candidates.
    #[must_use]
    pub const fn empty(weight: f64, search_radius_used: u32) -> Self {
        Self {
            count: 0,
            top_candidates: Vec::new(),
            nearest_distance_m: None,
            weight,
            score: 0.0,
            search_radius_used,
            error: None,
        }
    }

    /// Zero analysis recording why the type could not be queried.
    pub fn failed(weight: f64, search_radius_used: u32, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(weight, search_radius_used)
        }
    }
}

/// Facility highlighted to reviewers, drawn from every type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct CriticalFacility {
    /// Facility type identifier.
    pub facility_type: String,
    /// Display name.
    pub name: String,
    /// Distance from the reported location, in metres.
    pub distance_m: f64,
    /// Configured weight of the facility type.
    pub weight: f64,
}

/// Why a default result was returned instead of a computed one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct FallbackInfo {
    /// Machine-readable failure kind, e.g. `invalid_coordinate`.
    pub kind: String,
    /// Description of the underlying failure.
    pub message: String,
    /// Explanation shown alongside the default priority.
    pub fallback_reason: String,
    /// HTTP status a surrounding service should report, e.g. 429.
    pub status: u16,
    /// Suggested `Retry-After` delay in seconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub retry_after_secs: Option<u64>,
}

/// Inputs for one priority calculation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PriorityRequest {
    /// Reported latitude.
    pub latitude: f64,
    /// Reported longitude.
    pub longitude: f64,
    /// Complaint category, e.g. `pothole`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub complaint_type: String,
    /// Reporter-declared location metadata.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location_meta: LocationMeta,
}

/// Outcome of a priority calculation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct PriorityResult {
    /// Final score in `0.0..=1.0`, rounded to two decimals.
    pub priority_score: f64,
    /// Band matching `priority_score`.
    pub priority_level: PriorityLevel,
    /// Analysis per facility type identifier.
    pub per_type: BTreeMap<String, FacilityTypeAnalysis>,
    /// Bonus for the total number of nearby facilities.
    pub density_bonus: f64,
    /// Weighted proximity score including the diversity bonus.
    pub proximity_score: f64,
    /// Complaint/facility multiplier applied.
    pub complaint_multiplier: f64,
    /// Privacy tier multiplier applied.
    pub privacy_adjustment: f64,
    /// Detected surroundings.
    pub area_type: AreaType,
    /// Planned search radius, in metres.
    pub search_radius: u32,
    /// Full explanation of the score.
    pub reasoning: String,
    /// Up to five facilities ordered by type weight.
    pub critical_facilities: Vec<CriticalFacility>,
    /// One-line summary for listings.
    pub recommendation_reason: String,
    /// Populated only when the default result was returned.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<FallbackInfo>,
}

/// Score assigned when a calculation cannot complete.
pub const FALLBACK_SCORE: f64 = 0.5;

impl PriorityResult {
    /// Default medium-priority result describing `info`.
    #[must_use]
    pub fn fallback(info: FallbackInfo) -> Self {
        let reasoning = format!(
            "Priority could not be derived from nearby facilities ({}); a default medium priority was assigned.",
            info.fallback_reason
        );
        Self {
            priority_score: FALLBACK_SCORE,
            priority_level: PriorityLevel::from_score(FALLBACK_SCORE),
            per_type: BTreeMap::new(),
            density_bonus: 0.0,
            proximity_score: 0.0,
            complaint_multiplier: 1.0,
            privacy_adjustment: 1.0,
            area_type: AreaType::Unknown,
            search_radius: 0,
            reasoning,
            critical_facilities: Vec::new(),
            recommendation_reason: "Default priority: location analysis unavailable".to_owned(),
            error: Some(info),
        }
    }

    /// Report whether this is a default result.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
