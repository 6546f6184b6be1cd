//! Keyword-driven filtering of raw directory results.
//!
//! Each facility type compiles its configuration into an ordered list of
//! [`ClassificationRule`]s. A candidate is accepted only when every rule
//! admits it, so new types extend behaviour by adding rules rather than
//! branching in the control flow.

use std::collections::HashSet;

use civic_priority_core::{
    Coordinate, FacilityCandidate, FacilityTypeConfig, RawPlace, finite_or_zero,
};

/// Words that mark a name as a transport or logistics business.
pub const TRANSPORT_WORDS: [&str; 7] = [
    "transport",
    "logistics",
    "cargo",
    "travel",
    "bus",
    "taxi",
    "auto",
];

/// One predicate in a classifier's rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Reject names containing any of these lower-case keywords.
    ExcludeName(Vec<String>),
    /// Reject names containing any [`TRANSPORT_WORDS`] entry.
    RejectTransportName,
    /// Require a keyword in the name or in any type tag.
    RequireKeyword(Vec<String>),
}

impl ClassificationRule {
    /// Report whether a candidate with `name` and `tags` passes this rule.
    ///
    /// `name` must already be lower-case.
    fn admits(&self, name: &str, tags: &[String]) -> bool {
        match self {
            Self::ExcludeName(keywords) => !keywords.iter().any(|word| name.contains(word.as_str())),
            Self::RejectTransportName => !TRANSPORT_WORDS.iter().any(|word| name.contains(word)),
            Self::RequireKeyword(keywords) => keywords.iter().any(|word| {
                name.contains(word.as_str())
                    || tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(word.as_str()))
            }),
        }
    }
}

/// Ordered rule set for one facility type.
///
/// # Examples
/// ```
/// use civic_priority_core::{Coordinate, FacilityCatalog, RawPlace};
/// use civic_priority_scorer::FacilityClassifier;
///
/// let catalog = FacilityCatalog::default();
/// let hospital = catalog.get("hospital").expect("standard type");
/// let classifier = FacilityClassifier::for_type(hospital);
///
/// let origin = Coordinate::new(28.6139, 77.2090)?;
/// let places = vec![
///     RawPlace::new("Datta Krupa Transport", "t-1", 28.614, 77.209).with_types(&["hospital"]),
///     RawPlace::new("City Hospital", "h-1", 28.615, 77.209).with_types(&["hospital"]),
/// ];
/// let accepted = classifier.classify(&origin, places);
/// assert_eq!(accepted.len(), 1);
/// assert_eq!(accepted[0].name, "City Hospital");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityClassifier {
    rules: Vec<ClassificationRule>,
}

impl FacilityClassifier {
    /// Compile the rule set for `config`.
    ///
    /// Rules run in order: name exclusions, the transport guard for flagged
    /// types, then the include-keyword requirement.
    #[must_use]
    pub fn for_type(config: &FacilityTypeConfig) -> Self {
        let mut rules = Vec::new();
        let exclude = lowercase_all(&config.exclude_keywords);
        if !exclude.is_empty() {
            rules.push(ClassificationRule::ExcludeName(exclude));
        }
        if config.reject_transport_names {
            rules.push(ClassificationRule::RejectTransportName);
        }
        let include = lowercase_all(&config.include_keywords);
        if !include.is_empty() {
            rules.push(ClassificationRule::RequireKeyword(include));
        }
        Self { rules }
    }

    /// Build a classifier from explicit rules.
    #[must_use]
    pub const fn from_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Report whether a candidate passes every rule.
    #[must_use]
    pub fn admits(&self, name: &str, tags: &[String]) -> bool {
        let lowered = name.to_lowercase();
        self.rules.iter().all(|rule| rule.admits(&lowered, tags))
    }

    /// Convert raw places into accepted candidates around `origin`.
    #[must_use]
    pub fn classify(&self, origin: &Coordinate, places: Vec<RawPlace>) -> Vec<FacilityCandidate> {
        let candidates = places
            .into_iter()
            .map(|place| to_candidate(origin, place))
            .collect();
        self.filter(candidates)
    }

    /// Apply the rules, drop duplicate identifiers and sort by distance.
    ///
    /// Ties are broken by name. Filtering an already-filtered list returns it
    /// unchanged.
    #[must_use]
    pub fn filter(&self, candidates: Vec<FacilityCandidate>) -> Vec<FacilityCandidate> {
        let mut accepted: Vec<FacilityCandidate> = candidates
            .into_iter()
            .filter(|candidate| self.admits(&candidate.name, &candidate.types))
            .collect();
        accepted.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.name.cmp(&b.name))
        });
        let mut seen = HashSet::new();
        accepted.retain(|candidate| {
            candidate.external_id.is_empty() || seen.insert(candidate.external_id.clone())
        });
        accepted
    }
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

fn to_candidate(origin: &Coordinate, place: RawPlace) -> FacilityCandidate {
    FacilityCandidate {
        distance_m: finite_or_zero(origin.distance_to(place.location)),
        rating: place
            .rating
            .map(finite_or_zero)
            .filter(|rating| *rating >= 0.0)
            .unwrap_or_default(),
        vicinity: place.vicinity.unwrap_or_default(),
        name: place.name,
        external_id: place.external_id,
        types: place.types,
        location: place.location,
        open_now: place.open_now,
    }
}
