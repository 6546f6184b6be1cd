//! Combination of per-type analyses into the final priority.

use std::collections::BTreeMap;

use civic_priority_core::{
    CriticalFacility, FacilityTypeAnalysis, PriorityLevel, PrivacyLevel, round_hundredths,
    unit_interval,
};

/// Facilities listed in [`Aggregation::critical_facilities`].
pub const CRITICAL_FACILITY_LIMIT: usize = 5;

/// Per-type score above which a complaint multiplier applies.
const MULTIPLIER_SCORE_THRESHOLD: f64 = 0.5;

/// Entry in the complaint/facility multiplier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplaintMultiplier {
    /// Normalised complaint category, e.g. `sewage_overflow`.
    pub complaint_type: &'static str,
    /// Facility type identifier.
    pub facility_type: &'static str,
    /// Factor applied to the score.
    pub factor: f64,
}

const fn entry(
    complaint_type: &'static str,
    facility_type: &'static str,
    factor: f64,
) -> ComplaintMultiplier {
    ComplaintMultiplier {
        complaint_type,
        facility_type,
        factor,
    }
}

/// Complaint categories that matter more near particular facilities.
pub const COMPLAINT_MULTIPLIERS: &[ComplaintMultiplier] = &[
    entry("sewage_overflow", "hospital", 1.5),
    entry("sewage_overflow", "school", 1.3),
    entry("garbage", "hospital", 1.3),
    entry("garbage", "school", 1.2),
    entry("water_leakage", "hospital", 1.3),
    entry("drainage", "hospital", 1.3),
    entry("drainage", "school", 1.2),
    entry("pothole", "hospital", 1.2),
    entry("pothole", "fire_station", 1.2),
    entry("pothole", "school", 1.1),
    entry("road_damage", "hospital", 1.2),
    entry("road_damage", "fire_station", 1.2),
    entry("streetlight", "school", 1.2),
    entry("streetlight", "police", 1.2),
    entry("traffic_signal", "school", 1.3),
    entry("traffic_signal", "hospital", 1.2),
    entry("illegal_parking", "fire_station", 1.3),
    entry("illegal_parking", "hospital", 1.3),
    entry("stray_animals", "school", 1.2),
];

/// Aggregated figures for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Weighted proximity plus diversity bonus, at most 1.
    pub proximity_score: f64,
    /// Diversity bonus included in `proximity_score`.
    pub diversity_bonus: f64,
    /// Bonus for the total facility count.
    pub density_bonus: f64,
    /// Complaint multiplier applied.
    pub complaint_multiplier: f64,
    /// Privacy multiplier applied.
    pub privacy_adjustment: f64,
    /// Final score, rounded to two decimals.
    pub priority_score: f64,
    /// Band of `priority_score`.
    pub priority_level: PriorityLevel,
    /// Highest-weighted nearby facilities.
    pub critical_facilities: Vec<CriticalFacility>,
}

/// Folds per-type analyses into a single score.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use civic_priority_core::{PriorityLevel, PrivacyLevel};
/// use civic_priority_scorer::PriorityAggregator;
///
/// let outcome = PriorityAggregator.aggregate(&BTreeMap::new(), "pothole", PrivacyLevel::Exact);
/// assert_eq!(outcome.priority_score, 0.0);
/// assert_eq!(outcome.priority_level, PriorityLevel::Minimal);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAggregator;

impl PriorityAggregator {
    /// Combine `per_type` for a complaint of `complaint_type` reported at
    /// `privacy` precision.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "final score combines bonuses and multipliers"
    )]
    pub fn aggregate(
        self,
        per_type: &BTreeMap<String, FacilityTypeAnalysis>,
        complaint_type: &str,
        privacy: PrivacyLevel,
    ) -> Aggregation {
        let diversity_bonus = diversity_bonus(per_type);
        let proximity_score = unit_interval(weighted_proximity(per_type) + diversity_bonus);
        let density_bonus = density_bonus(per_type.values().map(|analysis| analysis.count).sum());
        let complaint_multiplier = complaint_multiplier(complaint_type, per_type);
        let privacy_adjustment = privacy.adjustment();
        let priority_score = round_hundredths(unit_interval(
            (proximity_score + density_bonus) * complaint_multiplier * privacy_adjustment,
        ));
        Aggregation {
            proximity_score,
            diversity_bonus,
            density_bonus,
            complaint_multiplier,
            privacy_adjustment,
            priority_score,
            priority_level: PriorityLevel::from_score(priority_score),
            critical_facilities: critical_facilities(per_type),
        }
    }
}

/// Weight-averaged score over types that scored above zero.
#[expect(
    clippy::float_arithmetic,
    reason = "weighted average of per-type scores"
)]
fn weighted_proximity(per_type: &BTreeMap<String, FacilityTypeAnalysis>) -> f64 {
    let (weighted, total_weight) = per_type
        .values()
        .filter(|analysis| analysis.score > 0.0)
        .fold((0.0, 0.0), |(sum, weights), analysis| {
            (sum + analysis.score * analysis.weight, weights + analysis.weight)
        });
    if total_weight > 0.0 {
        unit_interval(weighted / total_weight)
    } else {
        0.0
    }
}

fn scored_types(per_type: &BTreeMap<String, FacilityTypeAnalysis>) -> usize {
    per_type
        .values()
        .filter(|analysis| analysis.score > 0.0)
        .count()
}

/// Bonus for the number of distinct facility types that scored.
#[must_use]
pub fn diversity_bonus(per_type: &BTreeMap<String, FacilityTypeAnalysis>) -> f64 {
    match scored_types(per_type) {
        n if n >= 4 => 0.15,
        3 => 0.10,
        2 => 0.05,
        _ => 0.0,
    }
}

/// Bonus for the total number of classified facilities.
///
/// # Examples
/// ```
/// use civic_priority_scorer::density_bonus;
///
/// assert_eq!(density_bonus(50), 0.25);
/// assert_eq!(density_bonus(9), 0.05);
/// assert_eq!(density_bonus(4), 0.0);
/// ```
#[must_use]
pub const fn density_bonus(total_count: usize) -> f64 {
    match total_count {
        n if n >= 50 => 0.25,
        n if n >= 30 => 0.20,
        n if n >= 20 => 0.15,
        n if n >= 10 => 0.10,
        n if n >= 5 => 0.05,
        _ => 0.0,
    }
}

/// Normalise a complaint category: lower-case, with spaces and hyphens as
/// underscores.
#[must_use]
pub fn normalise_complaint_type(complaint_type: &str) -> String {
    complaint_type
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Largest table multiplier whose facility type scored above 0.5.
#[must_use]
pub fn complaint_multiplier(
    complaint_type: &str,
    per_type: &BTreeMap<String, FacilityTypeAnalysis>,
) -> f64 {
    let complaint = normalise_complaint_type(complaint_type);
    COMPLAINT_MULTIPLIERS
        .iter()
        .filter(|entry| entry.complaint_type == complaint)
        .filter(|entry| {
            per_type
                .get(entry.facility_type)
                .is_some_and(|analysis| analysis.score > MULTIPLIER_SCORE_THRESHOLD)
        })
        .map(|entry| entry.factor)
        .fold(1.0, f64::max)
}

fn critical_facilities(per_type: &BTreeMap<String, FacilityTypeAnalysis>) -> Vec<CriticalFacility> {
    let mut facilities: Vec<CriticalFacility> = per_type
        .iter()
        .flat_map(|(facility_type, analysis)| {
            analysis
                .top_candidates
                .iter()
                .map(move |candidate| CriticalFacility {
                    facility_type: facility_type.clone(),
                    name: candidate.name.clone(),
                    distance_m: candidate.distance_m,
                    weight: analysis.weight,
                })
        })
        .collect();
    facilities.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.distance_m.total_cmp(&b.distance_m))
    });
    facilities.truncate(CRITICAL_FACILITY_LIMIT);
    facilities
}
