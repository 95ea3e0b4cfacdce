//! Stable application-wide constants.
//!
//! Values here are numeric invariants of the distance engine and the circuit
//! breaker, plus default fallbacks for env-var-based configuration.
//! Runtime-tunable values live in [`Config`](crate::config::Config).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";
/// How long in-flight store calls may keep running after a shutdown signal.
/// Overridden by `SHUTDOWN_GRACE_SECS`.
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 10;

// --- Driver location store ---

/// Default nearest-search endpoint of the driver location store.
/// Overridden by `DRIVER_LOCATION_URL`.
pub const DEFAULT_DRIVER_LOCATION_URL: &str =
    "http://driverlocation:3001/api/v1/driver_locations/find_nearest";
/// Default timeout for a single store request. Overridden by `REQUEST_TIMEOUT_SECS`.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 15;
/// Header the store expects from trusted internal callers.
pub const AUTHENTICATED_HEADER: &str = "X-USER-AUTHENTICATED";

// --- Circuit breaker ---

/// Consecutive failures before the breaker starts gating. Overridden by `FAILURE_THRESHOLD`.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
/// Cooldown at the threshold itself; each further failure doubles it.
pub const BASE_BACKOFF_SECONDS: u64 = 2;
/// Default cap on the backoff exponent: 2s * 2^10 = 2048s (~34 min).
/// Overridden by `MAX_BACKOFF_EXPONENT`.
pub const DEFAULT_MAX_BACKOFF_EXPONENT: u32 = 10;
/// Hard upper bound accepted for `MAX_BACKOFF_EXPONENT`.
pub const MAX_BACKOFF_EXPONENT_LIMIT: u32 = 30;

// --- Geodesy ---

/// Mean radius of the Earth in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const METERS_PER_KM: f64 = 1000.0;

/// GeoJSON geometry type accepted for queries.
pub const GEOJSON_POINT: &str = "Point";
