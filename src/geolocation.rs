use thiserror::Error;
use tracing::debug;

use crate::models::Coordinates;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("Reverse geocoding failed: {0}")]
    GeocodeFailed(String),
}

/// Reverse-geocoded address parts; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Place {
    /// "name, city, region, country" with missing or blank parts left out
    pub fn describe(&self) -> String {
        [&self.name, &self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Position source consulted when a new entry is created
pub trait Geolocator {
    fn current_position(&self) -> Result<Coordinates, GeolocationError>;
    fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Place, GeolocationError>;
}

/// What was learned about the user's whereabouts; empty when nothing was
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFix {
    pub coordinates: Option<Coordinates>,
    pub place: String,
}

/// Best-effort lookup. Never fails: without a position the fix is empty, and
/// without a place description the coordinates are still kept.
pub fn locate(geolocator: &dyn Geolocator) -> LocationFix {
    let coordinates = match geolocator.current_position() {
        Ok(coordinates) => coordinates,
        Err(e) => {
            debug!(error = %e, "location unavailable, continuing without it");
            return LocationFix::default();
        }
    };

    let place = match geolocator.reverse_geocode(coordinates) {
        Ok(place) => place.describe(),
        Err(e) => {
            debug!(error = %e, "reverse geocoding failed");
            String::new()
        }
    };

    LocationFix {
        coordinates: Some(coordinates),
        place,
    }
}

/// A position supplied up front, e.g. from command-line flags
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    pub coordinates: Coordinates,
    pub place: Option<Place>,
}

impl Geolocator for FixedGeolocator {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.coordinates)
    }

    fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<Place, GeolocationError> {
        self.place
            .clone()
            .ok_or_else(|| GeolocationError::GeocodeFailed("no geocoder configured".to_string()))
    }
}

/// Used when no position source is available at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

impl Geolocator for NoGeolocator {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }

    fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<Place, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}
