use crate::constants::{EARTH_RADIUS_KM, METERS_PER_KM};
use crate::models::GeoPoint;
use serde::Serialize;
use std::fmt;

/// Great-circle distance between two points using the Haversine formula.
/// Returns distance in kilometers.
///
/// d = 2 * R * asin(sqrt(h))
/// h = sin²(Δlat/2) + cos(lat1) * cos(lat2) * sin²(Δlng/2)
pub fn distance_km(origin: &GeoPoint, target: &GeoPoint) -> f64 {
    let lat1_rad = origin.lat().to_radians();
    let lat2_rad = target.lat().to_radians();
    let delta_lat = (target.lat() - origin.lat()).to_radians();
    let delta_lng = (target.lng() - origin.lng()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    // rounding can push h a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Distance in kilometers
/// Every distance this service exposes is in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn new(km: f64) -> Result<Self, String> {
        if km < 0.0 {
            return Err("Distance cannot be negative".to_string());
        }
        if !km.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        Ok(DistanceKm(km))
    }

    /// Get the raw kilometers value
    pub fn as_km(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

/// Distance in meters
/// Query windows and the store's native distances are in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    /// Convert to kilometers
    pub fn to_km(self) -> DistanceKm {
        DistanceKm(self.0 / METERS_PER_KM)
    }

    /// Get the raw meters value
    pub fn as_meters(self) -> f64 {
        self.0
    }
}

impl From<u64> for DistanceMeters {
    fn from(meters: u64) -> Self {
        DistanceMeters(meters as f64)
    }
}

impl fmt::Display for DistanceMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}m", self.0)
    }
}

/// Unit of the approximate distance reported by the location store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
}

impl DistanceUnit {
    /// Normalize a raw store value in this unit to kilometers
    pub fn to_km(self, value: f64) -> Result<DistanceKm, String> {
        let km = match self {
            DistanceUnit::Meters => DistanceMeters(value).to_km(),
            DistanceUnit::Kilometers => DistanceKm(value),
        };
        DistanceKm::new(km.as_km())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "meters" => Ok(DistanceUnit::Meters),
            "km" | "kilometers" => Ok(DistanceUnit::Kilometers),
            _ => Err(format!(
                "Invalid distance unit: {}. Use 'meters' or 'kilometers'",
                s
            )),
        }
    }
}
