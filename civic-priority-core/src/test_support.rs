//! Test-only places clients and sleepers used by unit and behaviour tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::{
    Coordinate, EARTH_RADIUS_M, FacilityQueryClient, PlaceQueryError, RawPlace, Sleeper,
};

/// One request observed by a test client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCall {
    /// Requested category.
    pub keyword: String,
    /// Requested radius in metres.
    pub radius_m: u32,
}

/// In-memory directory returning canned places per keyword.
///
/// Places farther than the requested radius are filtered out, mirroring a
/// real directory. Unlisted keywords return no places unless
/// [`StaticPlacesClient::failing_everything`] was used.
#[derive(Debug, Default)]
pub struct StaticPlacesClient {
    responses: HashMap<String, Result<Vec<RawPlace>, PlaceQueryError>>,
    default_error: Option<PlaceQueryError>,
    unconfigured: bool,
    calls: Mutex<Vec<QueryCall>>,
}

impl StaticPlacesClient {
    /// Return `places` for `keyword`.
    #[must_use]
    pub fn with_places(mut self, keyword: &str, places: Vec<RawPlace>) -> Self {
        self.responses.insert(keyword.to_owned(), Ok(places));
        self
    }

    /// Fail every query for `keyword` with `error`.
    #[must_use]
    pub fn with_error(mut self, keyword: &str, error: PlaceQueryError) -> Self {
        self.responses.insert(keyword.to_owned(), Err(error));
        self
    }

    /// Fail every query not explicitly configured.
    #[must_use]
    pub fn failing_everything(mut self, error: PlaceQueryError) -> Self {
        self.default_error = Some(error);
        self
    }

    /// Report missing credentials from [`FacilityQueryClient::is_configured`].
    #[must_use]
    pub fn unconfigured(mut self) -> Self {
        self.unconfigured = true;
        self
    }

    /// Requests observed so far, in order.
    pub fn calls(&self) -> Vec<QueryCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FacilityQueryClient for StaticPlacesClient {
    fn nearby(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(QueryCall {
                keyword: keyword.to_owned(),
                radius_m,
            });
        match self.responses.get(keyword) {
            Some(Ok(places)) => Ok(places
                .iter()
                .filter(|place| origin.distance_to(place.location) <= f64::from(radius_m))
                .cloned()
                .collect()),
            Some(Err(error)) => Err(error.clone()),
            None => self.default_error.clone().map_or(Ok(Vec::new()), Err),
        }
    }

    fn is_configured(&self) -> bool {
        !self.unconfigured
    }
}

/// Client replaying a fixed sequence of outcomes, then returning no places.
#[derive(Debug, Default)]
pub struct ScriptedPlacesClient {
    script: Mutex<VecDeque<Result<Vec<RawPlace>, PlaceQueryError>>>,
    calls: Mutex<usize>,
}

impl ScriptedPlacesClient {
    /// Replay `outcomes` in order.
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<RawPlace>, PlaceQueryError>>,
    {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(0),
        }
    }

    /// Number of requests observed.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FacilityQueryClient for ScriptedPlacesClient {
    fn nearby(
        &self,
        _origin: &Coordinate,
        _keyword: &str,
        _radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// [`Sleeper`] that records requested waits instead of blocking.
///
/// Clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Waits requested so far, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// Place `metres` due north of `origin`.
pub fn place_north_of(origin: &Coordinate, metres: f64, name: &str, id: &str) -> RawPlace {
    let latitude = origin.latitude() + (metres / EARTH_RADIUS_M).to_degrees();
    RawPlace::new(name, id, latitude, origin.longitude())
}
