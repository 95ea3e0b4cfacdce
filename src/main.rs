use axum::Router;
use locationmatcher::config::Config;
use locationmatcher::services::driver_location::DriverLocationClient;
use locationmatcher::services::matcher::LocationMatcher;
use locationmatcher::shutdown::Shutdown;
use locationmatcher::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locationmatcher=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting location matcher");
    tracing::info!(
        destination = %config.driver_location_url,
        failure_threshold = config.matcher.failure_threshold,
        "Driver location store: {} (circuit threshold {})",
        config.driver_location_url,
        config.matcher.failure_threshold
    );

    let client = Arc::new(DriverLocationClient::new(config.request_timeout));
    let matcher = LocationMatcher::new(
        client,
        [config.driver_location_url.clone()],
        &config.matcher,
    );

    let shutdown = Shutdown::new();
    let state = Arc::new(AppState {
        matcher,
        driver_location_url: config.driver_location_url.clone(),
        shutdown: shutdown.clone(),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", locationmatcher::routes::create_router(state))
        .fallback(locationmatcher::routes::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tokio::spawn(shutdown.clone().run(shutdown_signal(), config.shutdown_grace));

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.server_stopping())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C. Without a handler the server runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
