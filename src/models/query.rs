use crate::error::{AppError, Result};
use crate::models::distance::DistanceMeters;
use crate::models::point::{CoordinateError, GeoPoint, Location};
use serde::{Deserialize, Serialize};

pub const INVALID_TYPE_MESSAGE: &str = "you must provide a valid GeoJSON type";
pub const INVALID_WINDOW_MESSAGE: &str = "maxDistance must be greater than 0 and minDistance";

/// Nearest-search request as sent by clients. Distances are in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub location: Location,
    #[serde(default)]
    pub min_distance: u64,
    #[serde(default)]
    pub max_distance: u64,
}

impl SearchQuery {
    pub fn new(lng: f64, lat: f64, min_distance: u64, max_distance: u64) -> Self {
        SearchQuery {
            location: Location::point(lng, lat),
            min_distance,
            max_distance,
        }
    }

    /// Check the query rule by rule and stop at the first violation.
    pub fn validate(&self) -> Result<ValidatedQuery> {
        if !self.location.is_point() {
            return Err(AppError::Validation(INVALID_TYPE_MESSAGE.to_string()));
        }

        let origin = crate::models::point::parse_point(&self.location.coordinates)
            .map_err(|e| match e {
                CoordinateError::InvalidCoordinates => AppError::InvalidCoordinates,
                range => AppError::Validation(range.to_string()),
            })?;

        if self.min_distance >= self.max_distance {
            return Err(AppError::Validation(INVALID_WINDOW_MESSAGE.to_string()));
        }

        Ok(ValidatedQuery {
            origin,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        })
    }
}

/// A query that passed validation. Only this type is ever sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedQuery {
    #[serde(rename = "location")]
    pub origin: GeoPoint,
    pub min_distance: u64,
    pub max_distance: u64,
}

impl ValidatedQuery {
    pub fn search_window(&self) -> (DistanceMeters, DistanceMeters) {
        (self.min_distance.into(), self.max_distance.into())
    }
}
