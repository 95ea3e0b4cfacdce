// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shutdown;

// Re-export commonly used types
pub use error::{AppError, CallError, Result};

use services::matcher::LocationMatcher;
use shutdown::Shutdown;

// App state for sharing across the application
pub struct AppState {
    pub matcher: LocationMatcher,
    /// Store destination used by the HTTP front
    pub driver_location_url: String,
    /// Hands out store call tokens that outlive the listener by a grace period
    pub shutdown: Shutdown,
}
