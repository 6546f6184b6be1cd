//! Data access adapters for the civic priority engine.
//!
//! Responsibilities:
//! - Implement [`civic_priority_core::FacilityQueryClient`] against HTTP
//!   places directories.
//! - Encapsulate the directory's wire format and status vocabulary.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `civic-priority-scorer`).
//! - Never log or surface the directory credential.
//!
//! Invariants:
//! - Thread-safe clients; no global mutable state.

#![forbid(unsafe_code)]

pub mod places;
