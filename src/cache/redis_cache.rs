use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::error::CacheError;
use crate::traits::cache_store::CacheStore;

/// Redis cache backend
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect to Redis; every later operation is bounded by `op_timeout`
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = tokio::time::timeout(op_timeout * 4, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout)??;

        info!("Redis connected at {}", redis_url);
        Ok(Self { conn, op_timeout })
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, CacheError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(CacheError::from),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        self.bounded(async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // Redis rejects EX 0
        let ttl_secs = ttl_secs.max(1);
        self.bounded(async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl_secs)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        self.bounded(async move { conn.del::<_, ()>(key).await })
            .await
    }
}
