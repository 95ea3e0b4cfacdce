use crate::services::circuit_breaker::CircuitStatus;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// GET /debug/health - Report circuit state for every store destination
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = "ok";
    let mut circuits = Map::new();

    for (destination, snapshot) in state.matcher.circuits() {
        if snapshot.status == CircuitStatus::BackoffGated {
            status = "degraded";
        }
        circuits.insert(destination.to_string(), json!(snapshot));
    }

    Json(json!({
        "status": status,
        "checks": { "circuits": circuits }
    }))
}
