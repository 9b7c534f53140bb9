use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::CacheError;
use crate::traits::cache_store::CacheStore;

/// In-process cache backend
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let live = match self.entries.get(key) {
            Some(entry) => {
                let (value, expires_at) = entry.value();
                (Instant::now() < *expires_at).then(|| value.clone())
            }
            None => return Ok(None),
        };

        if live.is_some() {
            return Ok(live);
        }

        // Expired: evict unless a writer refreshed it meanwhile
        self.entries
            .remove_if(key, |_, (_, expires_at)| Instant::now() >= *expires_at);
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let now = Instant::now();
        // Expired entries are swept on every write
        self.entries.retain(|_, (_, expires_at)| now < *expires_at);
        self.entries
            .insert(key.to_string(), (value, now + Duration::from_secs(ttl_secs)));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
