//! Request pacing for the external places directory.
//!
//! The directory enforces per-second quotas, so queries are spaced out by a
//! [`RateLimiter`]. [`IntervalLimiter`] keeps a minimum gap between
//! consecutive acquisitions and honours a shared [`CancellationToken`].
//! Waiting goes through a [`Sleeper`] so tests can observe back-pressure
//! without blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::places::PlaceQueryError;

/// Block the current thread for a duration.
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Shared flag that stops outstanding directory work.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Report whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Grant permission to issue one directory request.
pub trait RateLimiter: Send + Sync {
    /// Wait until a request may be issued.
    ///
    /// # Errors
    /// Returns [`PlaceQueryError::Cancelled`] once the caller has cancelled.
    fn acquire(&self) -> Result<(), PlaceQueryError>;
}

/// Limiter that never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl RateLimiter for Unthrottled {
    fn acquire(&self) -> Result<(), PlaceQueryError> {
        Ok(())
    }
}

/// Keep at least `interval` between consecutive acquisitions.
///
/// The first acquisition never waits.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use civic_priority_core::{IntervalLimiter, PlaceQueryError, RateLimiter};
///
/// let limiter = IntervalLimiter::new(Duration::from_millis(1));
/// limiter.acquire()?;
/// limiter.token().cancel();
/// assert_eq!(limiter.acquire(), Err(PlaceQueryError::Cancelled));
/// # Ok::<(), PlaceQueryError>(())
/// ```
#[derive(Debug)]
pub struct IntervalLimiter<S = ThreadSleeper> {
    interval: Duration,
    last: Mutex<Option<Instant>>,
    token: CancellationToken,
    sleeper: S,
}

impl IntervalLimiter<ThreadSleeper> {
    /// Create a limiter that sleeps the current thread.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, ThreadSleeper)
    }
}

impl<S: Sleeper> IntervalLimiter<S> {
    /// Create a limiter that waits through `sleeper`.
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
            token: CancellationToken::new(),
            sleeper,
        }
    }

    /// Share an existing cancellation token.
    #[must_use]
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Token that cancels this limiter.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Configured minimum spacing.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl<S: Sleeper> RateLimiter for IntervalLimiter<S> {
    fn acquire(&self) -> Result<(), PlaceQueryError> {
        if self.token.is_cancelled() {
            return Err(PlaceQueryError::Cancelled);
        }
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                self.sleeper.sleep(self.interval.saturating_sub(elapsed));
            }
        }
        if self.token.is_cancelled() {
            return Err(PlaceQueryError::Cancelled);
        }
        *last = Some(Instant::now());
        Ok(())
    }
}
