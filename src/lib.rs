//! Facade crate for the civic priority engine.
//!
//! This crate re-exports the core domain types and the scoring engine, and
//! exposes the HTTP places directory client behind the `places-http` feature.

#![forbid(unsafe_code)]

pub use civic_priority_core::{
    AreaType, CancellationToken, Coordinate, FacilityCatalog, FacilityQueryClient,
    FacilityTypeConfig, LocationMeta, PlaceQueryError, PriorityLevel, PriorityRequest,
    PriorityResult, PrivacyLevel, RawPlace, ServiceBounds,
};
pub use civic_priority_scorer::{EngineConfig, PriorityEngine, PriorityError, RetryPolicy};

#[cfg(feature = "places-http")]
pub use civic_priority_data::places::{HttpPlacesClient, HttpPlacesClientConfig};
