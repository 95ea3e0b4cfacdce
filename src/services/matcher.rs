use crate::config::MatcherConfig;
use crate::error::{AppError, Result};
use crate::models::{
    parse_point, ApiResponse, Candidate, DistanceUnit, GeoPoint, LocationsResponse, RawCandidate,
    SearchQuery,
};
use crate::services::circuit_breaker::{Circuit, CircuitBreaker, CircuitSnapshot};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type StoreResponse = ApiResponse<LocationsResponse<RawCandidate>>;

/// Nearest-driver lookup against one or more driver location stores.
///
/// Each destination gets its own circuit breaker when the matcher is built;
/// the breakers live as long as the matcher does.
pub struct LocationMatcher {
    breakers: BTreeMap<String, CircuitBreaker<Arc<dyn Circuit>>>,
    store_distance_unit: DistanceUnit,
}

impl LocationMatcher {
    pub fn new<I>(circuit: Arc<dyn Circuit>, destinations: I, config: &MatcherConfig) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let breakers = destinations
            .into_iter()
            .map(|destination| {
                let breaker = CircuitBreaker::with_max_backoff_exponent(
                    circuit.clone(),
                    config.failure_threshold,
                    config.max_backoff_exponent,
                );
                (destination.into(), breaker)
            })
            .collect();

        LocationMatcher {
            breakers,
            store_distance_unit: config.store_distance_unit,
        }
    }

    /// Find the drivers nearest to the query point.
    ///
    /// Invalid queries are rejected before any call is made. An empty result
    /// means the store found nothing; failures to reach or read the store are
    /// always errors.
    pub async fn find_nearest(
        &self,
        cancel: &CancellationToken,
        destination: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Candidate>> {
        let validated = query.validate()?;

        let breaker = self
            .breakers
            .get(destination)
            .ok_or_else(|| AppError::UnknownDestination(destination.to_string()))?;

        let (min_distance, max_distance) = validated.search_window();
        tracing::info!(
            lng = validated.origin.lng(),
            lat = validated.origin.lat(),
            "Nearest search: ({:.5}, {:.5}), window {} - {}",
            validated.origin.lng(),
            validated.origin.lat(),
            min_distance,
            max_distance
        );

        let payload = serde_json::to_vec(&validated)
            .map_err(|e| AppError::Transport(format!("Failed to encode query: {}", e)))?;

        let body = breaker.call(cancel, destination, payload).await?;

        let response: StoreResponse = serde_json::from_slice(&body)
            .map_err(|e| AppError::Transport(format!("Failed to parse response: {}", e)))?;

        let raw_candidates = response.data.map(|d| d.locations).unwrap_or_default();

        let candidates = raw_candidates
            .into_iter()
            .map(|raw| self.rescore(&validated.origin, raw))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            found = candidates.len(),
            "Nearest search returned {} drivers",
            candidates.len()
        );

        Ok(candidates)
    }

    /// Breaker state per destination
    pub fn circuits(&self) -> impl Iterator<Item = (&str, CircuitSnapshot)> + '_ {
        self.breakers
            .iter()
            .map(|(destination, breaker)| (destination.as_str(), breaker.snapshot()))
    }

    fn rescore(&self, origin: &GeoPoint, raw: RawCandidate) -> Result<Candidate> {
        let location = parse_point(&raw.location.coordinates).map_err(|e| {
            tracing::warn!(
                id = %raw.id,
                "Driver location {} has unusable coordinates: {}",
                raw.id,
                e
            );
            AppError::InvalidCoordinates
        })?;

        let mongo_distance = raw.mongo_distance.and_then(|value| {
            match self.store_distance_unit.to_km(value) {
                Ok(km) => Some(km),
                Err(e) => {
                    tracing::warn!(
                        id = %raw.id,
                        "Ignoring store distance {} for {}: {}",
                        value,
                        raw.id,
                        e
                    );
                    None
                }
            }
        });

        let distance = origin.distance_to(&location);
        tracing::trace!(id = %raw.id, "Driver {} is {} away", raw.id, distance);

        Ok(Candidate {
            distance,
            id: raw.id,
            location,
            mongo_distance,
        })
    }
}
