use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single outbound call, as seen through a [`Circuit`](crate::services::circuit_breaker::Circuit).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("service unreachable")]
    ServiceUnreachable,

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid coordinates")]
    InvalidCoordinates,

    #[error("Bad Request")]
    BadRequest,

    #[error("service unreachable")]
    ServiceUnreachable,

    #[error("Driver location service error: {0}")]
    Transport(String),

    #[error("No circuit registered for destination: {0}")]
    UnknownDestination(String),
}

impl From<CallError> for AppError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::ServiceUnreachable => AppError::ServiceUnreachable,
            other => AppError::Transport(other.to_string()),
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::InvalidCoordinates | AppError::BadRequest => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::ServiceUnreachable => {
                tracing::warn!("Driver location service unreachable, circuit is gating");
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable".to_string())
            }
            AppError::Transport(ref e) => {
                tracing::error!("Driver location service error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::UnknownDestination(ref d) => {
                tracing::error!("No circuit registered for destination {}", d);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "code": status.as_u16(),
            "msg": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
