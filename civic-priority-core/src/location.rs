//! Caller-declared location metadata.
//!
//! Reporters choose how precisely their position is shared. The engine never
//! mutates this metadata; it only reads the privacy tier and the declared
//! accuracy radius.

use std::str::FromStr;

/// Precision tier the reporter chose when sharing a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PrivacyLevel {
    /// Precise GPS fix.
    Exact,
    /// Snapped to the nearest street.
    Street,
    /// Generalised to a neighbourhood.
    Area,
    /// Not declared.
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl PrivacyLevel {
    /// Return the tier as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Street => "street",
            Self::Area => "area",
            Self::Unknown => "unknown",
        }
    }

    /// Multiplier applied to the final score for this tier.
    ///
    /// # Examples
    /// ```
    /// use civic_priority_core::PrivacyLevel;
    ///
    /// assert_eq!(PrivacyLevel::Exact.adjustment(), 1.0);
    /// assert_eq!(PrivacyLevel::Area.adjustment(), 0.90);
    /// ```
    #[must_use]
    pub const fn adjustment(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Area => 0.90,
            Self::Street | Self::Unknown => 0.95,
        }
    }
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "street" => Ok(Self::Street),
            "area" => Ok(Self::Area),
            "unknown" | "" => Ok(Self::Unknown),
            _ => Err(format!("unknown privacy level '{s}'")),
        }
    }
}

/// Metadata describing how a reported location was captured.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct LocationMeta {
    /// Declared privacy tier.
    pub privacy_level: PrivacyLevel,
    /// Declared accuracy radius in metres.
    pub radius_m: f64,
    /// Free-form precision label from the capturing device.
    pub precision: String,
    /// Human-readable location description.
    pub description: String,
}

impl LocationMeta {
    /// Metadata with the given privacy tier and no declared accuracy.
    #[must_use]
    pub fn with_privacy(privacy_level: PrivacyLevel) -> Self {
        Self {
            privacy_level,
            ..Self::default()
        }
    }

    /// Set the declared accuracy radius.
    #[must_use]
    pub fn with_radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }
}
