use crate::models::distance::DistanceKm;
use crate::models::point::{GeoPoint, Location};
use serde::{Deserialize, Serialize};

/// A driver location as the store returns it.
/// `mongo_distance` is the store's own approximate distance in its native unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCandidate {
    #[serde(rename = "_id")]
    pub id: String,
    pub location: Location,
    #[serde(default)]
    pub mongo_distance: Option<f64>,
}

/// A driver location re-scored against the query origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: String,
    pub location: GeoPoint,
    /// Exact Haversine distance from the query origin
    pub distance: DistanceKm,
    /// Store-reported approximate distance, normalized to kilometers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongo_distance: Option<DistanceKm>,
}

/// `data` payload of a nearest-search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsResponse<T> {
    pub total: usize,
    pub locations: Vec<T>,
}

/// Response envelope shared with the driver location store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            code: 200,
            msg: None,
            data: Some(data),
        }
    }
}
