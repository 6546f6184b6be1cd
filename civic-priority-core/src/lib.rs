//! Core domain types for the civic priority engine.
//!
//! These models validate their input at construction so downstream scoring
//! stages can rely on finite, in-range values. The external places directory
//! is abstracted behind [`FacilityQueryClient`]; request pacing lives in
//! [`pacing`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod coordinate;
pub mod location;
pub mod numeric;
pub mod pacing;
pub mod places;
pub mod priority;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use catalog::{CatalogError, FacilityCatalog, FacilityTypeConfig};
pub use coordinate::{Coordinate, EARTH_RADIUS_M, InvalidCoordinate, ServiceBounds, haversine_m};
pub use location::{LocationMeta, PrivacyLevel};
pub use numeric::{finite_or_zero, round_hundredths, unit_interval};
pub use pacing::{
    CancellationToken, IntervalLimiter, RateLimiter, Sleeper, ThreadSleeper, Unthrottled,
};
pub use places::{FacilityQueryClient, PlaceQueryError, RawPlace};
pub use priority::{
    AreaType, CriticalFacility, FALLBACK_SCORE, FacilityCandidate, FacilityTypeAnalysis,
    FallbackInfo, PriorityLevel, PriorityRequest, PriorityResult,
};
