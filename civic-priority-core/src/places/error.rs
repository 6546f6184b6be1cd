use thiserror::Error;

/// Errors from [`crate::places::FacilityQueryClient::nearby`].
///
/// Every variant is recoverable from the engine's point of view: a failing
/// query only zeroes the facility type or probe that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceQueryError {
    /// The directory refused the request because a usage quota was exhausted.
    #[error("places directory quota exceeded: {message}")]
    QuotaExceeded {
        /// Message reported by the directory.
        message: String,
    },
    /// The directory rejected the credential.
    #[error("places directory denied the request: {message}")]
    AuthDenied {
        /// Message reported by the directory.
        message: String,
    },
    /// Timeouts, connection failures, unexpected statuses or malformed bodies.
    #[error("places directory request failed: {message}")]
    TransientNetwork {
        /// Description of the failure.
        message: String,
    },
    /// The caller cancelled outstanding work.
    #[error("places query was cancelled")]
    Cancelled,
}

impl PlaceQueryError {
    /// Report whether repeating the request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }

    /// Shorthand for a [`PlaceQueryError::TransientNetwork`] error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientNetwork {
            message: message.into(),
        }
    }
}
