//! Places-directory client trait and the raw record it returns.

use geo::Point;

use crate::Coordinate;

use super::error::PlaceQueryError;

/// A place exactly as the directory reported it.
///
/// Records are unvalidated: the location may be far outside the requested
/// radius and the name may not match the requested category.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    /// Display name.
    pub name: String,
    /// Directory identifier, used to de-duplicate across categories.
    pub external_id: String,
    /// Position with `x = longitude`, `y = latitude`.
    pub location: Point<f64>,
    /// Average user rating, when reported.
    pub rating: Option<f64>,
    /// Directory category tags.
    pub types: Vec<String>,
    /// Short address, when reported.
    pub vicinity: Option<String>,
    /// Whether the place reported itself open at query time.
    pub open_now: Option<bool>,
}

impl RawPlace {
    /// Construct a record with a name, identifier and position.
    ///
    /// # Examples
    /// ```
    /// use civic_priority_core::RawPlace;
    ///
    /// let place = RawPlace::new("AIIMS", "p-1", 28.5672, 77.2100)
    ///     .with_types(&["hospital", "health"]);
    /// assert_eq!(place.location.y(), 28.5672);
    /// assert_eq!(place.types.len(), 2);
    /// ```
    pub fn new(
        name: impl Into<String>,
        external_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            external_id: external_id.into(),
            location: Point::new(longitude, latitude),
            rating: None,
            types: Vec::new(),
            vicinity: None,
            open_now: None,
        }
    }

    /// Attach category tags.
    #[must_use]
    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|tag| (*tag).to_owned()).collect();
        self
    }

    /// Record whether the place is currently open.
    #[must_use]
    pub fn with_open_now(mut self, open_now: bool) -> Self {
        self.open_now = Some(open_now);
        self
    }

    /// Attach a user rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Look up places of one category around a coordinate.
///
/// Implementations must be `Send + Sync` so a single client can back every
/// engine invocation in a process.
///
/// # Examples
///
/// ```rust
/// use civic_priority_core::{Coordinate, FacilityQueryClient, PlaceQueryError, RawPlace};
///
/// struct SingleHospital;
///
/// impl FacilityQueryClient for SingleHospital {
///     fn nearby(
///         &self,
///         _origin: &Coordinate,
///         keyword: &str,
///         _radius_m: u32,
///     ) -> Result<Vec<RawPlace>, PlaceQueryError> {
///         if keyword == "hospital" {
///             Ok(vec![RawPlace::new("City Hospital", "h-1", 28.61, 77.21)])
///         } else {
///             Ok(Vec::new())
///         }
///     }
/// }
///
/// let origin = Coordinate::new(28.6139, 77.2090)?;
/// let places = SingleHospital.nearby(&origin, "hospital", 1000)?;
/// assert_eq!(places.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait FacilityQueryClient: Send + Sync {
    /// Return places tagged `keyword` within `radius_m` metres of `origin`.
    fn nearby(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError>;

    /// Report whether the client holds the credentials it needs.
    ///
    /// The engine refuses to start a calculation with an unconfigured client.
    fn is_configured(&self) -> bool {
        true
    }
}

impl<T: FacilityQueryClient + ?Sized> FacilityQueryClient for Box<T> {
    fn nearby(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        (**self).nearby(origin, keyword, radius_m)
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::StaticPlacesClient;

    #[rstest]
    fn boxed_clients_delegate() {
        let client: Box<dyn FacilityQueryClient> = Box::new(
            StaticPlacesClient::default()
                .with_places("bank", vec![RawPlace::new("SBI", "b-1", 28.614, 77.209)]),
        );
        let origin = Coordinate::new(28.6139, 77.2090).expect("valid coordinate");
        let places = client.nearby(&origin, "bank", 500).expect("stub succeeds");
        assert_eq!(places.len(), 1);
        assert!(client.is_configured());
    }

    #[rstest]
    fn unconfigured_stub_reports_missing_credentials() {
        let client = StaticPlacesClient::default().unconfigured();
        assert!(!client.is_configured());
    }
}
