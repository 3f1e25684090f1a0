//! Recording test doubles for the gateway ports
//!
//! Used by unit and integration tests to script upstream behavior and
//! to assert on cache traffic without a network or filesystem.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::GatewayError;
use crate::domain::provider::PreparedRequest;
use crate::ports::cache::CacheStore;
use crate::ports::transport::{Transport, TransportResponse};

/// Transport that replays a scripted queue of responses and records
/// every request it was asked to execute
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, GatewayError>>>,
    requests: Arc<Mutex<Vec<PreparedRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method queueing a status/body response
    pub fn with_response(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse {
                status,
                body: body.to_string(),
            }));
        self
    }

    /// Builder method queueing a transport-level failure
    pub fn with_failure(self, error: GatewayError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// All requests executed so far, in order
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: PreparedRequest) -> Result<TransportResponse, GatewayError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("transport script exhausted".into())))
    }
}

/// Cache store that records every get/set, for asserting what a code
/// path did (or did not) touch
#[derive(Debug, Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, Value>>,
    gets: Mutex<Vec<String>>,
    sets: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_log(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn set_log(&self) -> Vec<String> {
        self.sets.lock().unwrap().clone()
    }

    /// Total reads plus writes observed
    pub fn traffic(&self) -> usize {
        self.gets.lock().unwrap().len() + self.sets.lock().unwrap().len()
    }
}

impl CacheStore for RecordingCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.gets.lock().unwrap().push(key.to_string());
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value, _ttl: Duration) {
        self.sets.lock().unwrap().push(key.to_string());
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
