use crate::constants::GEOJSON_POINT;
use crate::models::distance::DistanceKm;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("invalid coordinates")]
    InvalidCoordinates,

    #[error("you must provide a valid longitude")]
    Longitude(f64),

    #[error("you must provide a valid latitude")]
    Latitude(f64),
}

/// A validated geographic point, stored in GeoJSON order (longitude first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lng: f64,
    lat: f64,
}

impl GeoPoint {
    /// Note the argument order: longitude, then latitude.
    pub fn new(lng: f64, lat: f64) -> Result<Self, CoordinateError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(CoordinateError::InvalidCoordinates);
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        Ok(GeoPoint { lng, lat })
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Haversine distance to another point
    pub fn distance_to(&self, other: &GeoPoint) -> DistanceKm {
        DistanceKm(crate::models::distance::distance_km(self, other))
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Location {
            kind: GEOJSON_POINT.to_string(),
            coordinates: RawCoordinates::Pair([self.lng, self.lat]),
        }
        .serialize(serializer)
    }
}

/// Coordinates exactly as they arrived on the wire.
///
/// Clients and the store do not agree on one shape: a fixed float pair, a
/// numeric array of any length, or an array of arbitrary JSON values. All of
/// them funnel through [`RawCoordinates::to_pair`]; anything else is kept as
/// `Other` so that the `type` check can still run first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinates {
    Pair([f64; 2]),
    Numbers(Vec<f64>),
    Values(Vec<Value>),
    Other(Value),
}

impl Default for RawCoordinates {
    fn default() -> Self {
        RawCoordinates::Other(Value::Null)
    }
}

impl RawCoordinates {
    /// Extract `[longitude, latitude]` without range checks
    pub fn to_pair(&self) -> Result<[f64; 2], CoordinateError> {
        let pair = match self {
            RawCoordinates::Pair(pair) => *pair,
            RawCoordinates::Numbers(numbers) => match numbers.as_slice() {
                [lng, lat] => [*lng, *lat],
                _ => return Err(CoordinateError::InvalidCoordinates),
            },
            RawCoordinates::Values(values) => match values.as_slice() {
                [lng, lat] => [
                    lng.as_f64().ok_or(CoordinateError::InvalidCoordinates)?,
                    lat.as_f64().ok_or(CoordinateError::InvalidCoordinates)?,
                ],
                _ => return Err(CoordinateError::InvalidCoordinates),
            },
            RawCoordinates::Other(_) => return Err(CoordinateError::InvalidCoordinates),
        };

        if pair.iter().all(|c| c.is_finite()) {
            Ok(pair)
        } else {
            Err(CoordinateError::InvalidCoordinates)
        }
    }
}

/// GeoJSON-style location as received from clients and the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: RawCoordinates,
}

impl Location {
    pub fn point(lng: f64, lat: f64) -> Self {
        Location {
            kind: GEOJSON_POINT.to_string(),
            coordinates: RawCoordinates::Pair([lng, lat]),
        }
    }

    pub fn is_point(&self) -> bool {
        self.kind == GEOJSON_POINT
    }
}

/// Parse wire coordinates into a validated point.
pub fn parse_point(raw: &RawCoordinates) -> Result<GeoPoint, CoordinateError> {
    let [lng, lat] = raw.to_pair()?;
    GeoPoint::new(lng, lat)
}
