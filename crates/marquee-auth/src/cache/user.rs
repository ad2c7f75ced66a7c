//! Read-through user cache.
//!
//! Sits in front of the user store on the hot path of every authenticated
//! request. Lookups by id and by email live in distinct key namespaces, so a
//! numeric-looking email can never alias an id entry.
//!
//! Consistency model: entries are idempotent snapshots with a bounded TTL.
//! Concurrent misses for the same key may each query the store and each
//! write the result back (last writer wins); no lookup ever blocks on
//! another lookup's store round trip. Profile updates evict both key
//! namespaces immediately after the store write, bounding staleness to the
//! eviction pass rather than the TTL.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use marquee_auth::cache::{MemoryCacheStore, UserCache};
//!
//! let cache = UserCache::new(Arc::new(MemoryCacheStore::new()), store, Duration::from_secs(300));
//! let user = cache.get_by_id(42).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::AuthResult;
use crate::cache::store::CacheStore;
use crate::error::AuthError;
use crate::storage::{User, UserPatch, UserStore};

/// Key namespace for lookups by numeric id.
const ID_KEY_PREFIX: &str = "user:id:";

/// Key namespace for lookups by email.
const EMAIL_KEY_PREFIX: &str = "user:email:";

/// Which alternate key a lookup uses.
enum UserKey<'a> {
    Id(i64),
    Email(&'a str),
}

impl UserKey<'_> {
    fn cache_key(&self) -> String {
        match self {
            UserKey::Id(id) => format!("{ID_KEY_PREFIX}{id}"),
            UserKey::Email(email) => format!("{EMAIL_KEY_PREFIX}{email}"),
        }
    }
}

/// Read-through cache over the user store.
pub struct UserCache {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn UserStore>,
    ttl: Duration,
}

impl UserCache {
    /// Creates a read-through cache with the given entry TTL.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>, store: Arc<dyn UserStore>, ttl: Duration) -> Self {
        Self { cache, store, ttl }
    }

    /// Resolves a user by numeric id.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no such user exists (never cached), or a
    /// storage error if the store stays unreachable after one retry.
    pub async fn get_by_id(&self, id: i64) -> AuthResult<User> {
        self.resolve(UserKey::Id(id)).await
    }

    /// Resolves a user by email.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`UserCache::get_by_id`].
    pub async fn get_by_email(&self, email: &str) -> AuthResult<User> {
        self.resolve(UserKey::Email(email)).await
    }

    /// Applies a profile patch and evicts both cache entries for the user.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist, or a storage error
    /// if the write fails.
    pub async fn update(&self, id: i64, patch: &UserPatch) -> AuthResult<User> {
        let updated = self.store.update(id, patch).await?;
        self.invalidate(&updated).await;
        Ok(updated)
    }

    /// Evicts the id- and email-keyed entries for a user.
    pub async fn invalidate(&self, user: &User) {
        self.cache.delete(&UserKey::Id(user.id).cache_key()).await;
        self.cache
            .delete(&UserKey::Email(&user.email).cache_key())
            .await;
        tracing::debug!(user_id = user.id, "user cache entries evicted");
    }

    async fn resolve(&self, key: UserKey<'_>) -> AuthResult<User> {
        let cache_key = key.cache_key();

        if let Some(bytes) = self.cache.get(&cache_key).await {
            match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => {
                    tracing::debug!(key = %cache_key, "user cache hit");
                    return Ok(user);
                }
                Err(err) => {
                    // A corrupt entry must not permanently poison the key.
                    tracing::warn!(key = %cache_key, error = %err, "corrupt cache entry, evicting");
                    self.cache.delete(&cache_key).await;
                }
            }
        }

        let found = match self.fetch(&key).await {
            Ok(found) => found,
            Err(err) if err.is_transient() => {
                tracing::warn!(key = %cache_key, error = %err, "user store error, retrying once");
                self.fetch(&key).await?
            }
            Err(err) => return Err(err),
        };

        // Negative results are never cached: a just-registered user must be
        // visible on the next lookup.
        let user = found.ok_or(AuthError::UserNotFound)?;

        match serde_json::to_vec(&user) {
            Ok(bytes) => self.cache.set(&cache_key, bytes, self.ttl).await,
            Err(err) => {
                tracing::warn!(key = %cache_key, error = %err, "failed to serialize user for cache");
            }
        }

        Ok(user)
    }

    async fn fetch(&self, key: &UserKey<'_>) -> AuthResult<Option<User>> {
        match key {
            UserKey::Id(id) => self.store.find_by_id(*id).await,
            UserKey::Email(email) => self.store.find_by_email(email).await,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
