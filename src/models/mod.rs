pub mod candidate;
pub mod distance;
pub mod point;
pub mod query;

pub use candidate::{ApiResponse, Candidate, LocationsResponse, RawCandidate};
pub use distance::{distance_km, DistanceKm, DistanceMeters, DistanceUnit};
pub use point::{parse_point, CoordinateError, GeoPoint, Location, RawCoordinates};
pub use query::{SearchQuery, ValidatedQuery};
