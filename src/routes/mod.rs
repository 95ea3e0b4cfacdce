pub mod debug;
pub mod find_nearest;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/find_nearest", post(find_nearest::find_nearest))
        .route("/debug/health", get(debug::health_check))
        .fallback(not_found)
        .with_state(state)
}

pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": 404, "msg": "Not Found" })),
    )
}
