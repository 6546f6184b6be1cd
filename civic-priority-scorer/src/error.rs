//! Errors that stop a priority calculation.

use std::time::Duration;

use civic_priority_core::{FallbackInfo, InvalidCoordinate, PlaceQueryError};
use thiserror::Error;

/// Fatal failures of [`crate::PriorityEngine::try_calculate`].
///
/// [`crate::PriorityEngine::calculate`] converts each of these into the
/// documented fallback result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriorityError {
    /// The reported position is unusable or outside the service area.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] InvalidCoordinate),
    /// The places client lacks the credentials it needs.
    #[error("places client is not configured: {reason}")]
    Configuration {
        /// What is missing.
        reason: String,
    },
    /// Every facility type query failed.
    #[error("every facility query failed: {last}")]
    AllQueriesFailed {
        /// Failure of the last type queried.
        #[source]
        last: PlaceQueryError,
    },
}

/// How a surrounding HTTP layer should report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureClass {
    /// HTTP status code.
    pub status: u16,
    /// Suggested `Retry-After` delay.
    pub retry_after: Option<Duration>,
}

impl FailureClass {
    const fn new(status: u16, retry_after_secs: Option<u64>) -> Self {
        let retry_after = match retry_after_secs {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };
        Self {
            status,
            retry_after,
        }
    }

    /// Configuration and authorisation problems.
    pub const UNAVAILABLE: Self = Self::new(503, Some(300));
    /// Directory quota exhausted.
    pub const RATE_LIMITED: Self = Self::new(429, Some(60));
    /// Caller supplied a bad position.
    pub const BAD_REQUEST: Self = Self::new(400, None);
    /// Anything else.
    pub const INTERNAL: Self = Self::new(500, None);
}

impl PriorityError {
    /// Machine-readable kind recorded in [`FallbackInfo::kind`].
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate(_) => "invalid_coordinate",
            Self::Configuration { .. } => "configuration",
            Self::AllQueriesFailed { .. } => "all_queries_failed",
        }
    }

    /// HTTP-facing classification of this failure.
    ///
    /// # Examples
    /// ```
    /// use civic_priority_core::PlaceQueryError;
    /// use civic_priority_scorer::{FailureClass, PriorityError};
    ///
    /// let err = PriorityError::AllQueriesFailed {
    ///     last: PlaceQueryError::QuotaExceeded { message: "daily limit".into() },
    /// };
    /// assert_eq!(err.failure_class(), FailureClass::RATE_LIMITED);
    /// ```
    #[must_use]
    pub const fn failure_class(&self) -> FailureClass {
        match self {
            Self::InvalidCoordinate(_) => FailureClass::BAD_REQUEST,
            Self::Configuration { .. }
            | Self::AllQueriesFailed {
                last: PlaceQueryError::AuthDenied { .. },
            } => FailureClass::UNAVAILABLE,
            Self::AllQueriesFailed {
                last: PlaceQueryError::QuotaExceeded { .. },
            } => FailureClass::RATE_LIMITED,
            Self::AllQueriesFailed { .. } => FailureClass::INTERNAL,
        }
    }

    /// Description attached to the fallback result, including the
    /// HTTP-facing classification from [`Self::failure_class`].
    #[must_use]
    pub fn fallback_info(&self) -> FallbackInfo {
        let fallback_reason = match self {
            Self::InvalidCoordinate(_) => "the reported coordinates are invalid",
            Self::Configuration { .. } => "the location service is not configured",
            Self::AllQueriesFailed {
                last: PlaceQueryError::QuotaExceeded { .. },
            } => "the location service quota is exhausted",
            Self::AllQueriesFailed {
                last: PlaceQueryError::AuthDenied { .. },
            } => "the location service rejected its credentials",
            Self::AllQueriesFailed { .. } => "the location service is unavailable",
        };
        let class = self.failure_class();
        FallbackInfo {
            kind: self.kind().to_owned(),
            message: self.to_string(),
            fallback_reason: fallback_reason.to_owned(),
            status: class.status,
            retry_after_secs: class.retry_after.map(|delay| delay.as_secs()),
        }
    }
}
