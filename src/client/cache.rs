//! Short-lived response cache for direct statistics calls.
//!
//! Keyed by request path. Uses DashMap so concurrent dashboard branches can
//! read and fill it without a global lock. Errors are never cached.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

struct CachedResponse {
    body: Value,
    stored_at: Instant,
}

pub struct ResponseCache {
    ttl: Duration,
    entries: DashMap<String, CachedResponse>,
}

impl ResponseCache {
    /// A zero `ttl` disables caching entirely
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }

        let fresh = self
            .entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.body.clone());

        if fresh.is_none() {
            self.entries.remove(key);
        } else {
            debug!(key, "response cache hit");
        }
        fresh
    }

    pub fn insert(&self, key: impl Into<String>, body: Value) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key.into(),
            CachedResponse {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
