//! Retry glue around a [`FacilityQueryClient`].

use std::time::Duration;

use civic_priority_core::{
    CancellationToken, Coordinate, FacilityQueryClient, PlaceQueryError, RawPlace, Sleeper,
    ThreadSleeper,
};
use log::warn;

/// How often and how patiently retryable failures are repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `n × backoff_step`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with linear backoff.
    #[must_use]
    pub const fn new(max_retries: u32, backoff_step: Duration) -> Self {
        Self {
            max_retries,
            backoff_step,
        }
    }

    /// Policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Wait before retry number `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use civic_priority_scorer::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay_for(2), Duration::from_secs(2));
    /// ```
    #[must_use]
    pub const fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Client wrapper that repeats transient failures with linear backoff.
///
/// Quota and authorisation denials are returned immediately: repeating them
/// only burns quota. Once the [`CancellationToken`] is cancelled no further
/// attempt or backoff is made and [`PlaceQueryError::Cancelled`] is returned.
#[derive(Debug)]
pub struct RetryingClient<C, S = ThreadSleeper> {
    inner: C,
    policy: RetryPolicy,
    sleeper: S,
    token: CancellationToken,
}

impl<C: FacilityQueryClient> RetryingClient<C> {
    /// Wrap `inner`, sleeping the current thread between attempts.
    #[must_use]
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, ThreadSleeper)
    }
}

impl<C: FacilityQueryClient, S: Sleeper> RetryingClient<C, S> {
    /// Wrap `inner`, waiting through `sleeper` between attempts.
    #[must_use]
    pub fn with_sleeper(inner: C, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            inner,
            policy,
            sleeper,
            token: CancellationToken::new(),
        }
    }

    /// Stop retrying when `token` is cancelled.
    #[must_use]
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// The wrapped client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    /// Active retry policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl<C: FacilityQueryClient, S: Sleeper> FacilityQueryClient for RetryingClient<C, S> {
    fn nearby(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        let mut attempt = 0;
        loop {
            if self.token.is_cancelled() {
                return Err(PlaceQueryError::Cancelled);
            }
            match self.inner.nearby(origin, keyword, radius_m) {
                Err(err) if err.is_retryable() && attempt < self.policy.max_retries => {
                    if self.token.is_cancelled() {
                        return Err(PlaceQueryError::Cancelled);
                    }
                    attempt += 1;
                    let delay = self.policy.delay_for(attempt);
                    warn!("query for '{keyword}' failed ({err}); retry {attempt} in {delay:?}");
                    self.sleeper.sleep(delay);
                }
                outcome => return outcome,
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
