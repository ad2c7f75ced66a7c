//! Redis cache backend.
//!
//! Implements the `CacheStore` seam over a pooled Redis connection. Every
//! transport failure degrades to a miss or a no-op with a warning: the cache
//! is a latency optimization and must never fail a request.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;

use marquee_auth::CacheStore;

/// Remote cache backend over a Redis connection pool.
///
/// Writes and deletes are fire-and-forget: the caller gets its answer from
/// the store either way, and a lost write only costs a future cache miss.
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    /// Creates a pooled client for the given Redis URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or the pool cannot be
    /// configured. Connection failures surface later as per-call misses.
    pub fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = deadpool_redis::Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "failed to get Redis connection");
                return None;
            }
        };
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET error");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let pool = self.pool.clone();
        let key = key.to_string();
        let ttl_secs = ttl.as_secs().max(1);
        tokio::spawn(async move {
            if let Ok(mut conn) = pool.get().await {
                if let Err(e) = conn.set_ex::<_, _, ()>(&key, value, ttl_secs).await {
                    tracing::warn!(key = %key, error = %e, "Redis SET error");
                } else {
                    tracing::debug!(key = %key, ttl_secs = %ttl_secs, "cache set");
                }
            }
        });
    }

    async fn delete(&self, key: &str) {
        // Deletes are awaited: invalidation bounds staleness to this call,
        // not to the entry TTL.
        match self.pool.get().await {
            Ok(mut conn) => {
                if let Err(e) = conn.del::<_, ()>(key).await {
                    tracing::warn!(key = %key, error = %e, "Redis DEL error");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to get Redis connection");
            }
        }
    }
}
