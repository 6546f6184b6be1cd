//! Priority scoring for civic complaints.
//!
//! A complaint is scored by the critical infrastructure around it. The
//! [`PriorityEngine`] runs the whole pipeline for one request:
//! - **Area detection** issues broad probe queries and classifies the
//!   surroundings from the number of places returned ([`AreaTypeDetector`]).
//! - **Radius planning** derives a search radius from the area type, probe
//!   density and the reporter's declared accuracy ([`SearchRadiusPlanner`]).
//! - **Facility search** queries every configured facility type, retrying
//!   transient failures ([`RetryingClient`]) and filtering miscategorised
//!   results ([`FacilityClassifier`]).
//! - **Scoring** turns each type's candidates into a bounded score
//!   ([`FacilityTypeScorer`]) and combines them with density, complaint and
//!   privacy factors ([`PriorityAggregator`]).
//! - **Explanation** renders the reasoning and a one-line recommendation
//!   ([`ReasoningGenerator`]).
//!
//! Failures of individual queries only zero the affected facility type.
//! Fatal failures surface as [`PriorityError`] from
//! [`PriorityEngine::try_calculate`]; [`PriorityEngine::calculate`] turns them
//! into a default medium-priority result.
//!
//! # Examples
//!
//! ```
//! use civic_priority_core::test_support::StaticPlacesClient;
//! use civic_priority_core::{FacilityCatalog, PriorityLevel, PriorityRequest};
//! use civic_priority_scorer::{EngineConfig, PriorityEngine};
//!
//! // A directory with nothing nearby.
//! let engine = PriorityEngine::new(
//!     StaticPlacesClient::default(),
//!     FacilityCatalog::default(),
//!     EngineConfig::default().with_intervals(Default::default(), Default::default()),
//! );
//! let request = PriorityRequest {
//!     latitude: 28.6139,
//!     longitude: 77.2090,
//!     complaint_type: "sewage_overflow".into(),
//!     ..PriorityRequest::default()
//! };
//! let result = engine.calculate(&request);
//! assert_eq!(result.priority_level, PriorityLevel::Minimal);
//! assert!(result.error.is_none());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod area;
mod classifier;
mod engine;
mod error;
mod facility;
mod query;
mod radius;
mod reasoning;

pub use aggregate::{
    Aggregation, COMPLAINT_MULTIPLIERS, CRITICAL_FACILITY_LIMIT, ComplaintMultiplier,
    PriorityAggregator, complaint_multiplier, density_bonus, diversity_bonus,
    normalise_complaint_type,
};
pub use area::{
    AreaProfile, AreaTypeDetector, DEFAULT_PROBE_RADIUS_M, DEFAULT_PROBES, URBAN_INDICATORS,
    classify_area,
};
pub use classifier::{ClassificationRule, FacilityClassifier, TRANSPORT_WORDS};
pub use engine::{
    DEFAULT_PROBE_INTERVAL, DEFAULT_QUERY_INTERVAL, DEFAULT_REQUEST_TIMEOUT, EngineConfig,
    PriorityEngine,
};
pub use error::{FailureClass, PriorityError};
pub use facility::{
    CRITICAL_TAGS, FacilityTypeScorer, HIGH_IMPORTANCE_TAGS, TOP_CANDIDATES,
    importance_multiplier,
};
pub use query::{RetryPolicy, RetryingClient};
pub use radius::{MAX_ACCURACY_ALLOWANCE_M, MIN_RADIUS_M, RadiusBand, SearchRadiusPlanner};
pub use reasoning::{
    NearestFacility, REMOTE_LOCATION_MESSAGE, ReasoningContext, ReasoningGenerator,
    nearest_significant,
};
