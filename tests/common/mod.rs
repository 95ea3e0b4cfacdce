use async_trait::async_trait;
use locationmatcher::config::MatcherConfig;
use locationmatcher::services::circuit_breaker::Circuit;
use locationmatcher::services::matcher::LocationMatcher;
use locationmatcher::CallError;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[allow(dead_code)]
pub const STORE_URL: &str = "http://driverlocation:3001/api/v1/driver_locations/find_nearest";

/// What the fake store answers with
#[allow(dead_code)]
#[derive(Clone)]
pub enum Reply {
    Body(Value),
    Raw(Vec<u8>),
    Fail(CallError),
}

/// In-process stand-in for the driver location store.
/// Counts calls and keeps every payload it was sent.
pub struct MockStore {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<Value>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(MockStore {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(body: Value) -> Arc<Self> {
        Self::new(Reply::Body(body))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Reply::Fail(CallError::Request("connection refused".to_string())))
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Circuit for MockStore {
    async fn call(
        &self,
        _cancel: &CancellationToken,
        _destination: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(value) = serde_json::from_slice(&payload) {
            self.payloads.lock().unwrap().push(value);
        }

        match self.reply.lock().unwrap().clone() {
            Reply::Body(body) => Ok(serde_json::to_vec(&body).unwrap()),
            Reply::Raw(bytes) => Ok(bytes),
            Reply::Fail(e) => Err(e),
        }
    }
}

/// A driver document the way the store serializes it
#[allow(dead_code)]
pub fn driver(id: &str, lng: f64, lat: f64, mongo_distance_m: f64) -> Value {
    json!({
        "_id": id,
        "location": {"type": "Point", "coordinates": [lng, lat]},
        "mongo_distance": mongo_distance_m
    })
}

/// Store envelope wrapping a list of driver documents
#[allow(dead_code)]
pub fn store_body(locations: Vec<Value>) -> Value {
    json!({
        "code": 200,
        "data": {"total": locations.len(), "locations": locations}
    })
}

#[allow(dead_code)]
pub fn matcher_with(store: Arc<MockStore>, failure_threshold: u32) -> LocationMatcher {
    let config = MatcherConfig {
        failure_threshold,
        ..MatcherConfig::default()
    };
    LocationMatcher::new(store, [STORE_URL], &config)
}
