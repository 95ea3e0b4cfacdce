use crate::constants::*;
use crate::models::DistanceUnit;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Nearest-search endpoint of the driver location store
    pub driver_location_url: String,
    pub request_timeout: Duration,
    /// Time in-flight store calls get to finish once shutdown starts
    pub shutdown_grace: Duration,
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Consecutive failures before the circuit starts gating calls
    pub failure_threshold: u32,

    /// Cap on how far past the threshold the backoff keeps doubling.
    /// 10 means the cooldown never exceeds 2s * 2^10.
    pub max_backoff_exponent: u32,

    /// Unit of the store's approximate `mongo_distance`
    pub store_distance_unit: DistanceUnit,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            max_backoff_exponent: DEFAULT_MAX_BACKOFF_EXPONENT,
            store_distance_unit: DistanceUnit::default(),
        }
    }
}

impl MatcherConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let failure_threshold: u32 = env::var("FAILURE_THRESHOLD")
            .unwrap_or_else(|_| defaults.failure_threshold.to_string())
            .parse()
            .map_err(|_| "Invalid FAILURE_THRESHOLD")?;

        if failure_threshold == 0 {
            return Err("FAILURE_THRESHOLD must be at least 1".to_string());
        }

        let max_backoff_exponent: u32 = env::var("MAX_BACKOFF_EXPONENT")
            .unwrap_or_else(|_| defaults.max_backoff_exponent.to_string())
            .parse()
            .map_err(|_| "Invalid MAX_BACKOFF_EXPONENT")?;

        if max_backoff_exponent > MAX_BACKOFF_EXPONENT_LIMIT {
            return Err(format!(
                "MAX_BACKOFF_EXPONENT must be at most {}",
                MAX_BACKOFF_EXPONENT_LIMIT
            ));
        }

        let store_distance_unit = match env::var("STORE_DISTANCE_UNIT") {
            Ok(unit) => unit.parse()?,
            Err(_) => defaults.store_distance_unit,
        };

        Ok(Self {
            failure_threshold,
            max_backoff_exponent,
            store_distance_unit,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let request_timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid REQUEST_TIMEOUT_SECS")?;

        if request_timeout_secs == 0 {
            return Err("REQUEST_TIMEOUT_SECS must be at least 1".to_string());
        }

        let shutdown_grace_secs: u64 = env::var("SHUTDOWN_GRACE_SECS")
            .unwrap_or_else(|_| DEFAULT_SHUTDOWN_GRACE_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid SHUTDOWN_GRACE_SECS")?;

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            driver_location_url: env::var("DRIVER_LOCATION_URL")
                .unwrap_or_else(|_| DEFAULT_DRIVER_LOCATION_URL.to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            shutdown_grace: Duration::from_secs(shutdown_grace_secs),
            matcher: MatcherConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
