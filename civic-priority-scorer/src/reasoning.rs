//! Human-readable explanations of a priority score.

use std::collections::BTreeMap;

use civic_priority_core::{
    FacilityCandidate, FacilityCatalog, FacilityTypeAnalysis, PriorityLevel, PrivacyLevel,
};

use crate::aggregate::normalise_complaint_type;

/// Explanation used when no facility of any type was found.
pub const REMOTE_LOCATION_MESSAGE: &str = "No critical facilities were found near this location. \
It appears to be remote, so the priority reflects the reported issue alone.";

/// Everything the explanation draws on.
#[derive(Debug, Clone, Copy)]
pub struct ReasoningContext<'a> {
    /// Analyses keyed by facility type identifier.
    pub per_type: &'a BTreeMap<String, FacilityTypeAnalysis>,
    /// Catalog providing display labels.
    pub catalog: &'a FacilityCatalog,
    /// Complaint category as reported.
    pub complaint_type: &'a str,
    /// Declared location precision.
    pub privacy: PrivacyLevel,
    /// Final priority band.
    pub level: PriorityLevel,
}

/// The closest candidate among types that scored above zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestFacility<'a> {
    /// Facility type identifier.
    pub facility_type: &'a str,
    /// Display label of the type.
    pub label: &'a str,
    /// The candidate itself.
    pub candidate: &'a FacilityCandidate,
}

/// Renders the reasoning and recommendation strings.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use civic_priority_core::{FacilityCatalog, PriorityLevel, PrivacyLevel};
/// use civic_priority_scorer::{REMOTE_LOCATION_MESSAGE, ReasoningContext, ReasoningGenerator};
///
/// let per_type = BTreeMap::new();
/// let catalog = FacilityCatalog::default();
/// let context = ReasoningContext {
///     per_type: &per_type,
///     catalog: &catalog,
///     complaint_type: "pothole",
///     privacy: PrivacyLevel::Street,
///     level: PriorityLevel::Minimal,
/// };
/// assert_eq!(ReasoningGenerator.reasoning(&context), REMOTE_LOCATION_MESSAGE);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReasoningGenerator;

impl ReasoningGenerator {
    /// Full explanation of the score.
    #[must_use]
    pub fn reasoning(self, context: &ReasoningContext<'_>) -> String {
        let Some(nearest) = nearest_significant(context) else {
            return REMOTE_LOCATION_MESSAGE.to_owned();
        };
        let mut sentence = format!(
            "Nearest significant facility: {} ({}) at {}",
            nearest.candidate.name,
            nearest.label,
            format_distance(nearest.candidate.distance_m)
        );
        match other_types_present(context, nearest.facility_type) {
            0 => {}
            1 => sentence.push_str(", with 1 other facility type nearby"),
            n => sentence.push_str(&format!(", with {n} other facility types nearby")),
        }
        sentence.push('.');

        let clauses = [
            complaint_clause(context.complaint_type),
            privacy_clause(context.privacy).to_owned(),
            closing_clause(context.level).to_owned(),
        ];
        for clause in clauses.iter().filter(|clause| !clause.is_empty()) {
            sentence.push(' ');
            sentence.push_str(clause);
        }
        sentence
    }

    /// One-line summary for listings.
    #[must_use]
    pub fn recommendation(self, context: &ReasoningContext<'_>) -> String {
        nearest_significant(context).map_or_else(
            || format!("{} priority: no critical facilities nearby", context.level),
            |nearest| {
                format!(
                    "{} priority: {} within {}",
                    context.level,
                    nearest.label,
                    format_distance(nearest.candidate.distance_m)
                )
            },
        )
    }
}

/// Closest candidate among the types with a positive score.
#[must_use]
pub fn nearest_significant<'a>(context: &ReasoningContext<'a>) -> Option<NearestFacility<'a>> {
    context
        .per_type
        .iter()
        .filter(|(_, analysis)| analysis.score > 0.0)
        .filter_map(|(id, analysis)| {
            analysis.top_candidates.first().map(|candidate| NearestFacility {
                facility_type: id.as_str(),
                label: context.catalog.get(id).map_or(id.as_str(), |config| config.label()),
                candidate,
            })
        })
        .min_by(|a, b| a.candidate.distance_m.total_cmp(&b.candidate.distance_m))
}

fn other_types_present(context: &ReasoningContext<'_>, nearest_type: &str) -> usize {
    context
        .per_type
        .iter()
        .filter(|(id, analysis)| id.as_str() != nearest_type && analysis.count > 0)
        .count()
}

#[expect(
    clippy::float_arithmetic,
    reason = "kilometre conversion for display"
)]
fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{distance_m:.0} m")
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    }
}

fn complaint_clause(complaint_type: &str) -> String {
    let complaint = normalise_complaint_type(complaint_type);
    let mentions = |fragments: &[&str]| fragments.iter().any(|f| complaint.contains(f));
    let clause = if complaint.is_empty() {
        ""
    } else if mentions(&["sewage", "drain", "garbage", "waste"]) {
        "Sanitation problems near these facilities pose a public health risk."
    } else if mentions(&["pothole", "road"]) {
        "Damaged roads here can delay emergency access."
    } else if mentions(&["light"]) {
        "Poor lighting affects safety around these facilities."
    } else if mentions(&["water"]) {
        "Water problems here affect essential services."
    } else if mentions(&["traffic", "parking"]) {
        "Traffic disruption here can block access to essential services."
    } else {
        return format!("Reported issue: {}.", complaint.replace('_', " "));
    };
    clause.to_owned()
}

const fn privacy_clause(privacy: PrivacyLevel) -> &'static str {
    match privacy {
        PrivacyLevel::Exact => "The exact location was shared.",
        PrivacyLevel::Street => "The location is accurate to street level.",
        PrivacyLevel::Area => "Only an approximate area was shared, so distances may vary.",
        PrivacyLevel::Unknown => "The location precision is unknown.",
    }
}

const fn closing_clause(level: PriorityLevel) -> &'static str {
    match level {
        PriorityLevel::Critical => "Immediate attention is recommended.",
        PriorityLevel::High => "Prompt attention is recommended.",
        PriorityLevel::Medium => "This should be scheduled soon.",
        PriorityLevel::Low => "This can be handled in routine maintenance.",
        PriorityLevel::Minimal => "Few critical facilities are affected.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> FacilityCatalog {
        FacilityCatalog::default()
    }

    fn analysis(score: f64, candidates: &[(&str, f64)]) -> FacilityTypeAnalysis {
        let top_candidates: Vec<FacilityCandidate> = candidates
            .iter()
            .map(|(name, distance_m)| FacilityCandidate {
                name: (*name).to_owned(),
                external_id: (*name).to_owned(),
                distance_m: *distance_m,
                rating: 0.0,
                types: Vec::new(),
                vicinity: String::new(),
                location: Point::new(0.0, 0.0),
                open_now: None,
            })
            .collect();
        FacilityTypeAnalysis {
            count: top_candidates.len(),
            top_candidates,
            score,
            ..FacilityTypeAnalysis::empty(1.0, 1000)
        }
    }

    fn context<'a>(
        per_type: &'a BTreeMap<String, FacilityTypeAnalysis>,
        catalog: &'a FacilityCatalog,
        complaint_type: &'a str,
    ) -> ReasoningContext<'a> {
        ReasoningContext {
            per_type,
            catalog,
            complaint_type,
            privacy: PrivacyLevel::Street,
            level: PriorityLevel::High,
        }
    }

    fn sample() -> BTreeMap<String, FacilityTypeAnalysis> {
        let mut per_type = BTreeMap::new();
        per_type.insert("hospital".to_owned(), analysis(0.7, &[("AIIMS", 1450.0)]));
        per_type.insert("bank".to_owned(), analysis(0.4, &[("SBI", 320.0)]));
        per_type.insert("school".to_owned(), analysis(0.0, &[]));
        per_type.insert("police".to_owned(), analysis(0.3, &[("Thana", 800.0)]));
        per_type
    }

    #[rstest]
    fn names_nearest_scored_facility(catalog: FacilityCatalog) {
        let per_type = sample();
        let text = ReasoningGenerator.reasoning(&context(&per_type, &catalog, "pothole"));

        assert!(text.starts_with("Nearest significant facility: SBI (bank) at 320 m"));
        assert!(text.contains("with 2 other facility types nearby"));
        assert!(text.contains("Damaged roads"));
        assert!(text.contains("street level"));
        assert!(text.ends_with("Prompt attention is recommended."));
    }

    #[rstest]
    fn uses_catalog_labels_and_kilometres(catalog: FacilityCatalog) {
        let mut per_type = BTreeMap::new();
        per_type.insert("fire_station".to_owned(), analysis(0.2, &[("Fire HQ", 2340.0)]));
        let text = ReasoningGenerator.reasoning(&context(&per_type, &catalog, ""));

        assert_eq!(
            text,
            "Nearest significant facility: Fire HQ (fire station) at 2.3 km. \
             The location is accurate to street level. Prompt attention is recommended."
        );
    }

    #[rstest]
    fn unknown_complaint_is_echoed(catalog: FacilityCatalog) {
        let per_type = sample();
        let text = ReasoningGenerator.reasoning(&context(&per_type, &catalog, "Noise Pollution"));
        assert!(text.contains("Reported issue: noise pollution."));
    }

    #[rstest]
    fn remote_message_when_nothing_found(catalog: FacilityCatalog) {
        let mut per_type = BTreeMap::new();
        per_type.insert("hospital".to_owned(), analysis(0.0, &[]));
        let ctx = context(&per_type, &catalog, "pothole");

        assert_eq!(ReasoningGenerator.reasoning(&ctx), REMOTE_LOCATION_MESSAGE);
        assert_eq!(
            ReasoningGenerator.recommendation(&ctx),
            "HIGH priority: no critical facilities nearby"
        );
    }

    #[rstest]
    fn recommendation_names_nearest_type(catalog: FacilityCatalog) {
        let per_type = sample();
        assert_eq!(
            ReasoningGenerator.recommendation(&context(&per_type, &catalog, "pothole")),
            "HIGH priority: bank within 320 m"
        );
    }
}
