//! Best-effort cache layer
//!
//! [`Cache`] wraps a [`CacheStore`] backend and stores JSON-encoded values.
//! Backend failures never reach the caller: reads degrade to a miss and
//! writes become no-ops, both logged.

pub mod memory;
pub mod redis_cache;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::traits::cache_store::CacheStore;

pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;

#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Cache backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Cache get error for key {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to encode cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(key, raw, ttl_secs).await {
            error!("Cache set error for key {}: {}", key, e);
        }
    }

    pub async fn del(&self, key: &str) {
        if let Err(e) = self.store.del(key).await {
            error!("Cache del error for key {}: {}", key, e);
        }
    }
}
