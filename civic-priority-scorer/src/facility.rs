//! Per-type scoring of classified candidates.

use civic_priority_core::{
    FacilityCandidate, FacilityTypeAnalysis, FacilityTypeConfig, finite_or_zero, unit_interval,
};

/// Candidates kept in an analysis.
pub const TOP_CANDIDATES: usize = 5;

/// Tag fragments that mark an emergency-critical facility.
pub const CRITICAL_TAGS: [&str; 4] = ["hospital", "fire", "police", "emergency"];

/// Tag fragments that mark a high-importance facility.
pub const HIGH_IMPORTANCE_TAGS: [&str; 3] = ["school", "university", "government"];

const CRITICAL_MULTIPLIER: f64 = 1.3;
const HIGH_IMPORTANCE_MULTIPLIER: f64 = 1.1;
const OPERATIONAL_BONUS: f64 = 0.1;
const COUNT_BONUS_STEP: f64 = 0.05;
const COUNT_BONUS_CAP: f64 = 0.3;

/// Turns a sorted candidate list into a [`FacilityTypeAnalysis`].
///
/// # Examples
/// ```
/// use civic_priority_core::FacilityTypeConfig;
/// use civic_priority_scorer::FacilityTypeScorer;
///
/// let bank = FacilityTypeConfig::new("bank", 0.5, 2000);
/// let analysis = FacilityTypeScorer.score(&bank, Vec::new(), 1500);
/// assert_eq!(analysis.score, 0.0);
/// assert_eq!(analysis.count, 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FacilityTypeScorer;

impl FacilityTypeScorer {
    /// Score `candidates`, which must be sorted nearest first.
    #[must_use]
    pub fn score(
        self,
        config: &FacilityTypeConfig,
        mut candidates: Vec<FacilityCandidate>,
        search_radius_used: u32,
    ) -> FacilityTypeAnalysis {
        let Some(nearest) = candidates.first() else {
            return FacilityTypeAnalysis::empty(config.weight, search_radius_used);
        };
        let nearest_distance_m = nearest.distance_m;
        let score = combine(config, nearest, candidates.len());
        let count = candidates.len();
        candidates.truncate(TOP_CANDIDATES);
        FacilityTypeAnalysis {
            count,
            top_candidates: candidates,
            nearest_distance_m: Some(nearest_distance_m),
            weight: config.weight,
            score,
            search_radius_used,
            error: None,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "type score combines distance decay with additive bonuses"
)]
fn combine(config: &FacilityTypeConfig, nearest: &FacilityCandidate, count: usize) -> f64 {
    let max_radius = f64::from(config.max_radius_m);
    let distance_score = (1.0 - nearest.distance_m / max_radius).max(0.0);
    let count_bonus = (f64::from(saturating_u32(count)) * COUNT_BONUS_STEP).min(COUNT_BONUS_CAP);
    let operational_bonus = if nearest.open_now == Some(true) {
        OPERATIONAL_BONUS
    } else {
        0.0
    };
    let raw = (distance_score + count_bonus + operational_bonus) * importance_multiplier(nearest);
    unit_interval(finite_or_zero(raw))
}

/// Multiplier for the nearest candidate's category tags.
#[must_use]
pub fn importance_multiplier(candidate: &FacilityCandidate) -> f64 {
    let has_tag = |fragments: &[&str]| {
        candidate.types.iter().any(|tag| {
            let lowered = tag.to_lowercase();
            fragments.iter().any(|fragment| lowered.contains(fragment))
        })
    };
    if has_tag(&CRITICAL_TAGS) {
        CRITICAL_MULTIPLIER
    } else if has_tag(&HIGH_IMPORTANCE_TAGS) {
        HIGH_IMPORTANCE_MULTIPLIER
    } else {
        1.0
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
