//! Facility type catalog: weights, search radii and classification keywords.
//!
//! The catalog is validated once at construction and is read-only afterwards,
//! so a single instance can be shared by every engine invocation.

use std::collections::HashSet;

use thiserror::Error;

/// Configuration for one category of critical infrastructure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct FacilityTypeConfig {
    /// Stable identifier, e.g. `hospital`.
    pub id: String,
    /// Relative importance in `0.0..=1.0`.
    pub weight: f64,
    /// Largest radius ever searched for this type, in metres.
    pub max_radius_m: u32,
    /// Directory categories queried for this type.
    pub search_keys: Vec<String>,
    /// Candidates must mention one of these in their name or tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_keywords: Vec<String>,
    /// Candidates whose name mentions one of these are dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclude_keywords: Vec<String>,
    /// Drop candidates whose name reads like a transport or logistics firm.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reject_transport_names: bool,
    /// Human-readable label used in explanations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl FacilityTypeConfig {
    /// Start a configuration with the mandatory fields.
    pub fn new(id: impl Into<String>, weight: f64, max_radius_m: u32) -> Self {
        Self {
            id: id.into(),
            weight,
            max_radius_m,
            search_keys: Vec::new(),
            include_keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            reject_transport_names: false,
            description: String::new(),
        }
    }

    /// Set the directory categories to query.
    #[must_use]
    pub fn with_search_keys(mut self, keys: &[&str]) -> Self {
        self.search_keys = owned(keys);
        self
    }

    /// Set the keywords a candidate must mention.
    #[must_use]
    pub fn with_include_keywords(mut self, keywords: &[&str]) -> Self {
        self.include_keywords = owned(keywords);
        self
    }

    /// Set the keywords that disqualify a candidate.
    #[must_use]
    pub fn with_exclude_keywords(mut self, keywords: &[&str]) -> Self {
        self.exclude_keywords = owned(keywords);
        self
    }

    /// Enable the transport/logistics name guard.
    #[must_use]
    pub fn rejecting_transport_names(mut self) -> Self {
        self.reject_transport_names = true;
        self
    }

    /// Set the human-readable label.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Label used in explanations, falling back to the identifier.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.id
        } else {
            &self.description
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

/// Errors returned by [`FacilityCatalog::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// No facility types were supplied.
    #[error("facility catalog must contain at least one type")]
    Empty,
    /// Two entries share an identifier.
    #[error("facility type '{id}' is defined more than once")]
    DuplicateId {
        /// Repeated identifier.
        id: String,
    },
    /// A weight was non-finite or outside `0.0..=1.0`.
    #[error("facility type '{id}' has weight {weight}; expected 0.0..=1.0")]
    InvalidWeight {
        /// Offending type.
        id: String,
        /// Supplied weight.
        weight: f64,
    },
    /// A maximum radius of zero was supplied.
    #[error("facility type '{id}' must have a positive maximum radius")]
    ZeroRadius {
        /// Offending type.
        id: String,
    },
    /// No directory categories were configured.
    #[error("facility type '{id}' has no search keys")]
    MissingSearchKeys {
        /// Offending type.
        id: String,
    },
}

/// Ordered, validated set of facility type configurations.
///
/// # Examples
/// ```
/// use civic_priority_core::FacilityCatalog;
///
/// let catalog = FacilityCatalog::default();
/// assert_eq!(catalog.len(), 8);
/// assert!(catalog.get("hospital").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<FacilityTypeConfig>", into = "Vec<FacilityTypeConfig>")
)]
pub struct FacilityCatalog {
    types: Vec<FacilityTypeConfig>,
}

impl FacilityCatalog {
    /// Validate and construct a catalog.
    ///
    /// # Errors
    /// Returns [`CatalogError`] when the list is empty, identifiers repeat,
    /// or an entry carries an unusable weight, radius, or key list.
    pub fn new(types: Vec<FacilityTypeConfig>) -> Result<Self, CatalogError> {
        if types.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for config in &types {
            if !seen.insert(config.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: config.id.clone(),
                });
            }
            if !config.weight.is_finite() || !(0.0..=1.0).contains(&config.weight) {
                return Err(CatalogError::InvalidWeight {
                    id: config.id.clone(),
                    weight: config.weight,
                });
            }
            if config.max_radius_m == 0 {
                return Err(CatalogError::ZeroRadius {
                    id: config.id.clone(),
                });
            }
            if config.search_keys.is_empty() {
                return Err(CatalogError::MissingSearchKeys {
                    id: config.id.clone(),
                });
            }
        }
        Ok(Self { types })
    }

    /// Iterate over the configured types in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, FacilityTypeConfig> {
        self.types.iter()
    }

    /// Look up a type by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FacilityTypeConfig> {
        self.types.iter().find(|config| config.id == id)
    }

    /// Number of configured types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`; construction rejects empty catalogs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<'a> IntoIterator for &'a FacilityCatalog {
    type Item = &'a FacilityTypeConfig;
    type IntoIter = std::slice::Iter<'a, FacilityTypeConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<FacilityTypeConfig>> for FacilityCatalog {
    type Error = CatalogError;

    fn try_from(types: Vec<FacilityTypeConfig>) -> Result<Self, Self::Error> {
        Self::new(types)
    }
}

impl From<FacilityCatalog> for Vec<FacilityTypeConfig> {
    fn from(catalog: FacilityCatalog) -> Self {
        catalog.types
    }
}

impl Default for FacilityCatalog {
    /// The eight standard infrastructure categories.
    fn default() -> Self {
        Self {
            types: standard_types(),
        }
    }
}

fn standard_types() -> Vec<FacilityTypeConfig> {
    vec![
        FacilityTypeConfig::new("hospital", 1.0, 5000)
            .with_search_keys(&["hospital"])
            .with_include_keywords(&[
                "hospital", "clinic", "medical", "health", "nursing", "care", "doctor",
            ])
            .with_exclude_keywords(&["veterinary", "animal"])
            .rejecting_transport_names()
            .with_description("hospital"),
        FacilityTypeConfig::new("school", 0.85, 3000)
            .with_search_keys(&["school", "primary_school", "secondary_school"])
            .with_include_keywords(&[
                "school",
                "vidyalaya",
                "academy",
                "college",
                "education",
                "convent",
            ])
            .with_exclude_keywords(&["driving", "dance", "coaching", "tuition"])
            .rejecting_transport_names()
            .with_description("school"),
        FacilityTypeConfig::new("police", 0.9, 4000)
            .with_search_keys(&["police"])
            .with_include_keywords(&["police", "thana", "chowki"])
            .with_description("police station"),
        FacilityTypeConfig::new("fire_station", 0.95, 5000)
            .with_search_keys(&["fire_station"])
            .with_include_keywords(&["fire"])
            .with_exclude_keywords(&["fireworks", "firewood"])
            .with_description("fire station"),
        FacilityTypeConfig::new("transit", 0.6, 2000)
            .with_search_keys(&["bus_station", "transit_station", "train_station"])
            .with_description("transit stop"),
        FacilityTypeConfig::new("government", 0.7, 3000)
            .with_search_keys(&["local_government_office", "city_hall"])
            .with_include_keywords(&[
                "government",
                "municipal",
                "corporation",
                "office",
                "panchayat",
                "collector",
                "court",
            ])
            .rejecting_transport_names()
            .with_description("government office"),
        FacilityTypeConfig::new("bank", 0.5, 2000)
            .with_search_keys(&["bank"])
            .with_include_keywords(&["bank"])
            .with_exclude_keywords(&["blood bank", "food bank"])
            .with_description("bank"),
        FacilityTypeConfig::new("pharmacy", 0.65, 2000)
            .with_search_keys(&["pharmacy", "drugstore"])
            .with_include_keywords(&["pharmacy", "chemist", "medical", "drug", "medicine"])
            .with_description("pharmacy"),
    ]
}
