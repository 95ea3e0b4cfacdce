//! Failure-gating wrapper around an outbound call.
//!
//! The breaker keeps two facts per destination: how many calls in a row have
//! failed and when the last call was attempted. Its status is derived:
//!
//! ```text
//! BelowThreshold: failures <  threshold  -> every call goes through
//! BackoffGated:   failures >= threshold  -> calls go through only once
//!                 now > last_attempt + 2s * 2^(failures - threshold)
//! ```
//!
//! A success in either status resets the counter. There is no separate
//! half-open probe: once the window elapses, whoever calls next is let through.
//!
//! The gate check and the state update are two separate critical sections with
//! the call in between. Concurrent callers that see an elapsed window all go
//! through, and every one of their failures is counted. A call whose future
//! is dropped before it completes is recorded as a failure.

use crate::constants::{BASE_BACKOFF_SECONDS, DEFAULT_MAX_BACKOFF_EXPONENT};
use crate::error::CallError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// An outbound call: `(cancellation, destination, payload) -> response`.
#[async_trait]
pub trait Circuit: Send + Sync {
    async fn call(
        &self,
        cancel: &CancellationToken,
        destination: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, CallError>;
}

#[async_trait]
impl<C: Circuit + ?Sized> Circuit for Arc<C> {
    async fn call(
        &self,
        cancel: &CancellationToken,
        destination: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, CallError> {
        (**self).call(cancel, destination, payload).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStatus {
    BelowThreshold,
    BackoffGated,
}

/// Point-in-time view of a breaker, for health reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CircuitSnapshot {
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub status: CircuitStatus,
}

#[derive(Debug)]
struct CircuitState {
    consecutive_failures: u32,
    last_attempt: Instant,
}

pub struct CircuitBreaker<C> {
    circuit: C,
    failure_threshold: u32,
    max_backoff_exponent: u32,
    state: RwLock<CircuitState>,
}

impl<C: Circuit> CircuitBreaker<C> {
    pub fn new(circuit: C, failure_threshold: u32) -> Self {
        Self::with_max_backoff_exponent(circuit, failure_threshold, DEFAULT_MAX_BACKOFF_EXPONENT)
    }

    pub fn with_max_backoff_exponent(
        circuit: C,
        failure_threshold: u32,
        max_backoff_exponent: u32,
    ) -> Self {
        CircuitBreaker {
            circuit,
            failure_threshold,
            max_backoff_exponent,
            state: RwLock::new(CircuitState {
                consecutive_failures: 0,
                last_attempt: Instant::now(),
            }),
        }
    }

    /// Cooldown for a breaker sitting `overshoot` failures past the threshold.
    pub fn backoff_window(&self, overshoot: u32) -> Duration {
        let exponent = overshoot.min(self.max_backoff_exponent);
        Duration::from_secs(BASE_BACKOFF_SECONDS.saturating_mul(2u64.saturating_pow(exponent)))
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        CircuitSnapshot {
            consecutive_failures: state.consecutive_failures,
            failure_threshold: self.failure_threshold,
            status: if state.consecutive_failures >= self.failure_threshold {
                CircuitStatus::BackoffGated
            } else {
                CircuitStatus::BelowThreshold
            },
        }
    }

    /// When the gate opens again, or `None` if it is not engaged.
    fn retry_at(&self, state: &CircuitState) -> Option<Instant> {
        let overshoot = state.consecutive_failures.checked_sub(self.failure_threshold)?;
        // an unrepresentable instant is as good as never
        Some(
            state
                .last_attempt
                .checked_add(self.backoff_window(overshoot))
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(u32::MAX as u64)),
        )
    }

    fn record(&self, succeeded: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.last_attempt = Instant::now();

        if succeeded {
            if state.consecutive_failures > 0 {
                tracing::info!(
                    previous_failures = state.consecutive_failures,
                    "Circuit recovered after {} consecutive failures",
                    state.consecutive_failures
                );
            }
            state.consecutive_failures = 0;
        } else {
            state.consecutive_failures = state.consecutive_failures.saturating_add(1);
            tracing::warn!(
                consecutive_failures = state.consecutive_failures,
                threshold = self.failure_threshold,
                "Circuit call failed ({}/{})",
                state.consecutive_failures,
                self.failure_threshold
            );
        }
    }
}

#[async_trait]
impl<C: Circuit> Circuit for CircuitBreaker<C> {
    async fn call(
        &self,
        cancel: &CancellationToken,
        destination: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, CallError> {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(retry_at) = self.retry_at(&state) {
                let now = Instant::now();
                if now <= retry_at {
                    tracing::warn!(
                        destination = %destination,
                        consecutive_failures = state.consecutive_failures,
                        retry_in = ?(retry_at - now),
                        "Service unreachable, failing fast"
                    );
                    return Err(CallError::ServiceUnreachable);
                }
            }
        }

        let attempt = Attempt {
            breaker: self,
            pending: true,
        };
        let result = self.circuit.call(cancel, destination, payload).await;
        attempt.finish(result.is_ok());
        result
    }
}

/// An attempt in flight. Dropping it before `finish` counts as a failure.
struct Attempt<'a, C: Circuit> {
    breaker: &'a CircuitBreaker<C>,
    pending: bool,
}

impl<C: Circuit> Attempt<'_, C> {
    fn finish(mut self, succeeded: bool) {
        self.pending = false;
        self.breaker.record(succeeded);
    }
}

impl<C: Circuit> Drop for Attempt<'_, C> {
    fn drop(&mut self) {
        if self.pending {
            tracing::warn!("Circuit call abandoned before completing");
            self.breaker.record(false);
        }
    }
}
