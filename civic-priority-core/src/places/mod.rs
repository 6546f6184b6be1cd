//! Query a places directory for facilities near a coordinate.
//!
//! The `FacilityQueryClient` trait abstracts a single "find places of type X
//! within radius R" lookup. Callers receive raw [`RawPlace`] records, which
//! the scorer later classifies and measures.
//!
//! Errors are typed so the engine can isolate quota, credential and network
//! failures to the facility type that triggered them.

mod client;
mod error;

pub use client::{FacilityQueryClient, RawPlace};
pub use error::PlaceQueryError;
