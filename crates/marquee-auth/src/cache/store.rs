//! Cache store seam and the in-process backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

/// A remote key-value cache with per-entry TTL.
///
/// The interface is deliberately infallible: the cache is a latency
/// optimization, not a correctness dependency. Backends log transport
/// failures and degrade to a miss on reads and a no-op on writes, so an
/// unreachable cache never fails a request.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Gets a value. `None` means miss, expired, or backend unavailable.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Sets a value with a time-to-live.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Deletes a value.
    async fn delete(&self, key: &str);
}

// =============================================================================
// In-process backend
// =============================================================================

struct CachedEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub size: usize,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted due to TTL expiration.
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// In-process cache backend with TTL-based expiration.
///
/// Used in single-instance deployments and tests; multi-instance deployments
/// use the Redis backend in the server crate.
pub struct MemoryCacheStore {
    entries: DashMap<String, CachedEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MemoryCacheStore {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.expires_at <= now {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.data.clone());
            }
            drop(entry);
            self.entries.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                data: value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCacheStore::new();
        cache.set("k", b"v".to_vec(), Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await, Some(b"v".to_vec()));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCacheStore::new();
        assert_eq!(cache.get("absent").await, None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_not_served() {
        let cache = MemoryCacheStore::new();
        cache.set("k", b"v".to_vec(), Duration::from_millis(10)).await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCacheStore::new();
        cache.set("k", b"v".to_vec(), Duration::from_secs(60)).await;
        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let cache = MemoryCacheStore::new();
        for i in 0..3 {
            cache
                .set(&format!("k{i}"), vec![i], Duration::from_millis(10))
                .await;
        }
        cache.set("fresh", b"v".to_vec(), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.cleanup_expired(), 3);
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            size: 1,
            hits: 3,
            misses: 1,
            evictions: 0,
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert!((CacheStats::default().hit_rate() - 0.0).abs() < f64::EPSILON);
    }
}
