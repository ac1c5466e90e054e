//! Service state and the request-scoped store.
//!
//! # Responsibilities
//! - Hold the service-wide state seeded at construction
//! - Give every request a fresh store that references that state
//!
//! # Design Decisions
//! - State changes made by one request are visible to later requests
//! - Request locals never outlive the request that created them
//! - Both maps are concurrent so handlers never block each other

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::{Map, Value};

/// Shared service state: string keys mapped to JSON values.
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    inner: Arc<DashMap<String, Value>>,
}

impl ServiceState {
    /// Create a state seeded with the given entries.
    pub fn new(seed: Map<String, Value>) -> Self {
        let inner = DashMap::with_capacity(seed.len());
        for (k, v) in seed {
            inner.insert(k, v);
        }
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    /// Get a string entry.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .and_then(|r| r.value().as_str().map(str::to_string))
    }

    /// Set an entry, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.remove(key).map(|(_, v)| v)
    }

    /// Apply `f` to an entry in place, inserting `Null` first when absent.
    ///
    /// The entry is locked for the duration of `f`.
    pub fn update<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut entry = self.inner.entry(key.to_string()).or_insert(Value::Null);
        f(entry.value_mut())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Export the whole state as a JSON object (keys sorted).
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        Value::Object(map)
    }
}

/// Per-request store, inserted into request extensions by
/// [`RequestStoreMiddleware`](crate::http::middleware::RequestStoreMiddleware).
#[derive(Debug, Clone)]
pub struct RequestStore {
    state: ServiceState,
    locals: Arc<DashMap<String, Value>>,
    created_at: Instant,
}

impl RequestStore {
    pub fn new(state: ServiceState) -> Self {
        Self {
            state,
            locals: Arc::new(DashMap::new()),
            created_at: Instant::now(),
        }
    }

    /// The service state this request reads and writes.
    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn local(&self, key: &str) -> Option<Value> {
        self.locals.get(key).map(|r| r.value().clone())
    }

    /// Set a value visible only to handlers of this request.
    pub fn set_local(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.locals.insert(key.into(), value.into())
    }

    /// Time since the store was attached to its request.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
