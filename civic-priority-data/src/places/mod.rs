//! HTTP client for the places directory.
//!
//! [`HttpPlacesClient`] implements [`civic_priority_core::FacilityQueryClient`]
//! against a nearby-search JSON endpoint. Responses are decoded by
//! [`decode_nearby_response`], which is public so canned bodies can be
//! replayed without a network.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use civic_priority_core::{Coordinate, FacilityQueryClient};
//! use civic_priority_data::places::{HttpPlacesClient, HttpPlacesClientConfig};
//!
//! let config = HttpPlacesClientConfig::default()
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let client = HttpPlacesClient::with_config(config)?;
//!
//! let origin = Coordinate::new(28.6139, 77.2090)?;
//! let schools = client.nearby(&origin, "school", 3000)?;
//! println!("{} schools", schools.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod directory;
mod provider;

pub use directory::{Geometry, LatLng, NearbySearchResponse, OpeningHours, PlaceResult};
pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpPlacesClient, HttpPlacesClientConfig,
    PlacesClientBuildError, decode_nearby_response,
};
