//! Two-phase shutdown.
//!
//! On the signal the listener stops and axum drains open connections. Store
//! calls still in flight keep running until the grace period ends, and only
//! then is their cancellation token fired.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    server: CancellationToken,
    store_calls: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once the server should stop accepting connections.
    pub fn server_stopping(&self) -> impl Future<Output = ()> + Send + 'static {
        self.server.clone().cancelled_owned()
    }

    /// Token for a single store call, fired only after the grace period.
    pub fn store_call_token(&self) -> CancellationToken {
        self.store_calls.child_token()
    }

    /// Waits for `signal`, stops the server, then cancels whatever store
    /// calls are still running after `grace`.
    pub async fn run<F>(self, signal: F, grace: Duration)
    where
        F: Future<Output = ()>,
    {
        signal.await;
        tracing::info!("Shutdown signal received, draining for up to {:?}", grace);
        self.server.cancel();

        tokio::time::sleep(grace).await;
        tracing::warn!("Grace period over, cancelling in-flight store calls");
        self.store_calls.cancel();
    }
}
