//! Validated WGS84 coordinates and great-circle distance.
//!
//! A [`Coordinate`] can only be obtained through validation, so downstream
//! components never see non-finite or out-of-range positions. Deployments
//! that serve a single region can further restrict input through
//! [`ServiceBounds`].

use geo::Point;
use thiserror::Error;

use crate::numeric::finite_or_zero;

/// Mean Earth radius used by [`haversine_m`], in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Errors returned when a coordinate fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCoordinate {
    /// Latitude or longitude was `NaN` or infinite.
    #[error("coordinate ({latitude}, {longitude}) is not a finite number")]
    NonFinite {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {latitude} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Supplied latitude.
        latitude: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {longitude} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Supplied longitude.
        longitude: f64,
    },
    /// The coordinate is valid but lies outside the served region.
    #[error("coordinate ({latitude}, {longitude}) is outside the service area")]
    OutsideServiceArea {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },
}

/// A validated WGS84 position.
///
/// # Examples
/// ```
/// use civic_priority_core::Coordinate;
///
/// let delhi = Coordinate::new(28.6139, 77.2090)?;
/// assert_eq!(delhi.latitude(), 28.6139);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), civic_priority_core::InvalidCoordinate>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate a latitude/longitude pair.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinate`] when either value is non-finite or
    /// outside the WGS84 range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Validate a pair and require it to fall inside `bounds`, when given.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinate::OutsideServiceArea`] for valid positions
    /// outside `bounds`, plus the errors of [`Coordinate::new`].
    pub fn within(
        latitude: f64,
        longitude: f64,
        bounds: Option<&ServiceBounds>,
    ) -> Result<Self, InvalidCoordinate> {
        let coordinate = Self::new(latitude, longitude)?;
        match bounds {
            Some(area) if !area.contains(&coordinate) => {
                Err(InvalidCoordinate::OutsideServiceArea {
                    latitude,
                    longitude,
                })
            }
            _ => Ok(coordinate),
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The coordinate as a `geo` point (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Great-circle distance in metres to `other`.
    #[must_use]
    pub fn distance_to(&self, other: Point<f64>) -> f64 {
        haversine_m(self.point(), other)
    }
}

/// Inclusive latitude/longitude box served by a deployment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceBounds {
    /// Southern edge.
    pub min_latitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

impl ServiceBounds {
    /// Box enclosing mainland India and its island territories.
    #[must_use]
    pub const fn india() -> Self {
        Self {
            min_latitude: 6.0,
            max_latitude: 38.0,
            min_longitude: 68.0,
            max_longitude: 98.0,
        }
    }

    /// Report whether `coordinate` lies inside the box.
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.longitude)
    }
}

impl Default for ServiceBounds {
    fn default() -> Self {
        Self::india()
    }
}

/// Haversine great-circle distance in metres between two points.
///
/// Points use `x = longitude`, `y = latitude`. Non-finite input yields `0.0`
/// rather than `NaN`.
///
/// # Examples
/// ```
/// use geo::Point;
/// use civic_priority_core::haversine_m;
///
/// let a = Point::new(77.2090, 28.6139);
/// assert_eq!(haversine_m(a, a), 0.0);
/// ```
#[must_use]
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let half_d_lat = (lat_b - lat_a) / 2.0;
    let half_d_lon = (b.x() - a.x()).to_radians() / 2.0;
    let h = half_d_lat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_d_lon.sin().powi(2);
    let central_angle = 2.0 * h.sqrt().min(1.0).asin();
    finite_or_zero(EARTH_RADIUS_M * central_angle)
}
