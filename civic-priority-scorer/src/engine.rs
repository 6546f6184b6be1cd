//! Orchestration of a full priority calculation.

use std::collections::BTreeMap;
use std::time::Duration;

use civic_priority_core::{
    CancellationToken, Coordinate, FacilityCatalog, FacilityQueryClient, FacilityTypeAnalysis,
    FacilityTypeConfig, IntervalLimiter, PlaceQueryError, PriorityRequest, PriorityResult,
    RateLimiter, RawPlace, ServiceBounds, Sleeper, ThreadSleeper,
};
use log::{debug, info, warn};

use crate::aggregate::PriorityAggregator;
use crate::area::{AreaTypeDetector, DEFAULT_PROBE_RADIUS_M};
use crate::classifier::FacilityClassifier;
use crate::error::PriorityError;
use crate::facility::FacilityTypeScorer;
use crate::query::{RetryPolicy, RetryingClient};
use crate::radius::SearchRadiusPlanner;
use crate::reasoning::{ReasoningContext, ReasoningGenerator};

/// Default spacing between facility queries.
pub const DEFAULT_QUERY_INTERVAL: Duration = Duration::from_millis(200);

/// Default spacing between area probes.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(300);

/// Default per-request timeout for HTTP clients built from this config.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`PriorityEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Region the engine serves; `None` accepts any valid coordinate.
    pub service_bounds: Option<ServiceBounds>,
    /// Radius of the area probes, in metres.
    pub probe_radius_m: u32,
    /// Minimum spacing between facility queries.
    pub query_interval: Duration,
    /// Minimum spacing between area probes.
    pub probe_interval: Duration,
    /// Retry behaviour for transient query failures.
    pub retry: RetryPolicy,
    /// Per-request timeout handed to HTTP clients.
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_bounds: Some(ServiceBounds::default()),
            probe_radius_m: DEFAULT_PROBE_RADIUS_M,
            query_interval: DEFAULT_QUERY_INTERVAL,
            probe_interval: DEFAULT_PROBE_INTERVAL,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Restrict or lift the service area.
    #[must_use]
    pub const fn with_service_bounds(mut self, bounds: Option<ServiceBounds>) -> Self {
        self.service_bounds = bounds;
        self
    }

    /// Set the probe radius.
    #[must_use]
    pub const fn with_probe_radius_m(mut self, radius_m: u32) -> Self {
        self.probe_radius_m = radius_m;
        self
    }

    /// Set the spacing between facility queries and between probes.
    #[must_use]
    pub const fn with_intervals(mut self, query: Duration, probe: Duration) -> Self {
        self.query_interval = query;
        self.probe_interval = probe;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Scores civic complaints by their proximity to critical infrastructure.
///
/// The engine is immutable after construction and may be shared between
/// threads. Queries are issued sequentially and paced by interval limiters;
/// the limiters and the retrying client share one [`CancellationToken`].
///
/// # Examples
/// ```
/// use civic_priority_core::test_support::StaticPlacesClient;
/// use civic_priority_core::{FacilityCatalog, PriorityRequest, RawPlace};
/// use civic_priority_scorer::{EngineConfig, PriorityEngine};
/// use std::time::Duration;
///
/// let client = StaticPlacesClient::default().with_places(
///     "hospital",
///     vec![RawPlace::new("City Hospital", "h-1", 28.6150, 77.2090).with_types(&["hospital"])],
/// );
/// let config = EngineConfig::default().with_intervals(Duration::ZERO, Duration::ZERO);
/// let engine = PriorityEngine::new(client, FacilityCatalog::default(), config);
///
/// let request = PriorityRequest {
///     latitude: 28.6139,
///     longitude: 77.2090,
///     complaint_type: "pothole".into(),
///     ..PriorityRequest::default()
/// };
/// let result = engine.calculate(&request);
/// assert!(result.per_type["hospital"].score > 0.0);
/// assert!(result.reasoning.contains("hospital"));
/// ```
#[derive(Debug)]
pub struct PriorityEngine<C, S = ThreadSleeper> {
    client: RetryingClient<C, S>,
    catalog: FacilityCatalog,
    classifiers: Vec<FacilityClassifier>,
    config: EngineConfig,
    detector: AreaTypeDetector<IntervalLimiter<S>>,
    query_limiter: IntervalLimiter<S>,
    token: CancellationToken,
}

impl<C: FacilityQueryClient> PriorityEngine<C> {
    /// Build an engine that sleeps the current thread while pacing.
    #[must_use]
    pub fn new(client: C, catalog: FacilityCatalog, config: EngineConfig) -> Self {
        Self::with_sleeper(client, catalog, config, ThreadSleeper)
    }
}

impl<C, S> PriorityEngine<C, S>
where
    C: FacilityQueryClient,
    S: Sleeper + Clone,
{
    /// Build an engine that waits through `sleeper` for pacing and backoff.
    #[must_use]
    pub fn with_sleeper(
        client: C,
        catalog: FacilityCatalog,
        config: EngineConfig,
        sleeper: S,
    ) -> Self {
        let token = CancellationToken::new();
        let probe_limiter = IntervalLimiter::with_sleeper(config.probe_interval, sleeper.clone())
            .with_token(token.clone());
        let query_limiter = IntervalLimiter::with_sleeper(config.query_interval, sleeper.clone())
            .with_token(token.clone());
        let detector = AreaTypeDetector::new(probe_limiter).with_radius_m(config.probe_radius_m);
        let classifiers = catalog.iter().map(FacilityClassifier::for_type).collect();
        Self {
            client: RetryingClient::with_sleeper(client, config.retry, sleeper)
                .with_token(token.clone()),
            catalog,
            classifiers,
            config,
            detector,
            query_limiter,
            token,
        }
    }

    /// Catalog the engine scores against.
    #[must_use]
    pub const fn catalog(&self) -> &FacilityCatalog {
        &self.catalog
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying places client.
    #[must_use]
    pub const fn client(&self) -> &C {
        self.client.inner()
    }

    /// Token that cancels outstanding and future queries.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Score `request`, falling back to a default medium priority on any
    /// fatal error.
    ///
    /// The fallback result carries the error in [`PriorityResult::error`].
    #[must_use]
    pub fn calculate(&self, request: &PriorityRequest) -> PriorityResult {
        self.try_calculate(request).unwrap_or_else(|err| {
            warn!("priority calculation failed, returning fallback: {err}");
            PriorityResult::fallback(err.fallback_info())
        })
    }

    /// Score `request`.
    ///
    /// # Errors
    /// - [`PriorityError::InvalidCoordinate`] when the position is unusable
    ///   or outside the service area. No queries are issued.
    /// - [`PriorityError::Configuration`] when the client is unconfigured.
    ///   No queries are issued.
    /// - [`PriorityError::AllQueriesFailed`] when no facility type could be
    ///   queried.
    pub fn try_calculate(
        &self,
        request: &PriorityRequest,
    ) -> Result<PriorityResult, PriorityError> {
        let origin = Coordinate::within(
            request.latitude,
            request.longitude,
            self.config.service_bounds.as_ref(),
        )?;
        if !self.client.is_configured() {
            return Err(PriorityError::Configuration {
                reason: "the places client has no credentials".to_owned(),
            });
        }

        let area = self.detector.detect(&self.client, &origin);
        let search_radius = SearchRadiusPlanner.plan(
            area.area_type,
            area.density,
            request.location_meta.radius_m,
        );
        debug!(
            "area {} (density {}), planned radius {search_radius} m",
            area.area_type, area.density
        );

        let mut per_type = BTreeMap::new();
        let mut last_failure = None;
        let mut failed_types = 0_usize;
        for (config, classifier) in self.catalog.iter().zip(&self.classifiers) {
            let radius = SearchRadiusPlanner.effective_radius(search_radius, config);
            let analysis = match self.query_type(&origin, config, radius) {
                Ok(places) => {
                    FacilityTypeScorer.score(config, classifier.classify(&origin, places), radius)
                }
                Err(err) => {
                    warn!("facility type '{}' failed: {err}", config.id);
                    failed_types += 1;
                    let analysis =
                        FacilityTypeAnalysis::failed(config.weight, radius, err.to_string());
                    last_failure = Some(err);
                    analysis
                }
            };
            per_type.insert(config.id.clone(), analysis);
        }
        if failed_types == self.catalog.len()
            && let Some(last) = last_failure
        {
            return Err(PriorityError::AllQueriesFailed { last });
        }

        let aggregation = PriorityAggregator.aggregate(
            &per_type,
            &request.complaint_type,
            request.location_meta.privacy_level,
        );
        let context = ReasoningContext {
            per_type: &per_type,
            catalog: &self.catalog,
            complaint_type: &request.complaint_type,
            privacy: request.location_meta.privacy_level,
            level: aggregation.priority_level,
        };
        let reasoning = ReasoningGenerator.reasoning(&context);
        let recommendation_reason = ReasoningGenerator.recommendation(&context);
        info!(
            "priority {} ({}) for '{}' at ({}, {})",
            aggregation.priority_score,
            aggregation.priority_level,
            request.complaint_type,
            origin.latitude(),
            origin.longitude()
        );

        Ok(PriorityResult {
            priority_score: aggregation.priority_score,
            priority_level: aggregation.priority_level,
            per_type,
            density_bonus: aggregation.density_bonus,
            proximity_score: aggregation.proximity_score,
            complaint_multiplier: aggregation.complaint_multiplier,
            privacy_adjustment: aggregation.privacy_adjustment,
            area_type: area.area_type,
            search_radius,
            reasoning,
            critical_facilities: aggregation.critical_facilities,
            recommendation_reason,
            error: None,
        })
    }

    /// Query every search key of one type.
    ///
    /// Keys that fail are skipped as long as one succeeds.
    fn query_type(
        &self,
        origin: &Coordinate,
        config: &FacilityTypeConfig,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        let mut places = Vec::new();
        let mut last_error = None;
        let mut any_succeeded = false;
        for key in &config.search_keys {
            let outcome = self
                .query_limiter
                .acquire()
                .and_then(|()| self.client.nearby(origin, key, radius_m));
            match outcome {
                Ok(found) => {
                    debug!("'{key}' returned {} places within {radius_m} m", found.len());
                    any_succeeded = true;
                    places.extend(found);
                }
                Err(err) => {
                    warn!("search key '{key}' for '{}' failed: {err}", config.id);
                    last_error = Some(err);
                }
            }
        }
        match last_error {
            Some(err) if !any_succeeded => Err(err),
            _ => Ok(places),
        }
    }
}
