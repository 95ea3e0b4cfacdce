pub mod circuit_breaker;
pub mod driver_location;
pub mod matcher;
