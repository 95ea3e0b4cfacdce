use crate::error::{AppError, Result};
use crate::models::{ApiResponse, Candidate, LocationsResponse, SearchQuery};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

/// POST /find_nearest
/// Nearest drivers to a GeoJSON point, re-scored with exact distances
pub async fn find_nearest(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<ApiResponse<LocationsResponse<Candidate>>>> {
    let Json(query) = body.map_err(|e| {
        tracing::debug!("Rejected find_nearest body: {}", e);
        AppError::BadRequest
    })?;

    // cancelled only once the shutdown grace period has run out
    let cancel = state.shutdown.store_call_token();

    let locations = state
        .matcher
        .find_nearest(&cancel, &state.driver_location_url, &query)
        .await?;

    Ok(Json(ApiResponse::ok(LocationsResponse {
        total: locations.len(),
        locations,
    })))
}
