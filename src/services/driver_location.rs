use crate::constants::AUTHENTICATED_HEADER;
use crate::error::CallError;
use crate::services::circuit_breaker::Circuit;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Raw HTTP transport to the driver location store.
///
/// POSTs the payload as JSON and hands back the body bytes. 2xx and 404 (the
/// store's "no drivers found" reply) count as a completed call; any other
/// status is a failure.
#[derive(Clone)]
pub struct DriverLocationClient {
    client: Client,
    timeout: Duration,
}

impl DriverLocationClient {
    pub fn new(timeout: Duration) -> Self {
        DriverLocationClient {
            client: Client::new(),
            timeout,
        }
    }

    async fn post(&self, destination: &str, payload: Vec<u8>) -> Result<Vec<u8>, CallError> {
        let response = self
            .client
            .post(destination)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(AUTHENTICATED_HEADER, "true")
            .timeout(self.timeout)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallError::Timeout
                } else {
                    CallError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                destination = %destination,
                "Driver location HTTP error {}: {}",
                status, body
            );
            return Err(CallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CallError::Request(format!("Failed to read response: {}", e)))?;

        tracing::debug!(
            status = %status,
            bytes = body.len(),
            "Driver location response: {} ({} bytes)",
            status, body.len()
        );

        Ok(body.to_vec())
    }
}

#[async_trait]
impl Circuit for DriverLocationClient {
    async fn call(
        &self,
        cancel: &CancellationToken,
        destination: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, CallError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CallError::Cancelled),
            result = self.post(destination, payload) => result,
        }
    }
}
