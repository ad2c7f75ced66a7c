//! In-memory user store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;

use marquee_auth::{AuthError, AuthResult, User, UserPatch, UserStore};

/// Concurrent in-memory user store with a unique-email index.
pub struct MemoryUserStore {
    users: DashMap<i64, User>,
    by_email: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_email: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let Some(id) = self.by_email.get(email).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn create(&self, user: &User) -> AuthResult<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AuthError::conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = OffsetDateTime::now_utc();
        let mut stored = user.clone();
        stored.id = id;
        stored.created_at = now;
        stored.updated_at = now;
        self.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> AuthResult<User> {
        let mut entry = self.users.get_mut(&id).ok_or(AuthError::UserNotFound)?;
        if let Some(name) = &patch.name {
            entry.name = name.clone();
        }
        if let Some(hash) = &patch.password_hash {
            entry.password_hash = Some(hash.clone());
        }
        entry.updated_at = OffsetDateTime::now_utc();
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_auth::Role;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryUserStore::new();
        let a = store.create(&User::new("a@example.com", "A")).await.unwrap();
        let b = store.create(&User::new("b@example.com", "B")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_find_by_id_and_email() {
        let store = MemoryUserStore::new();
        let created = store
            .create(
                &User::builder("ada@example.com")
                    .name("Ada")
                    .role(Role::CinemaOwner)
                    .build(),
            )
            .await
            .unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");

        let by_email = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(store.find_by_id(999).await.unwrap().is_none());
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(&User::new("ada@example.com", "Ada")).await.unwrap();

        let err = store
            .create(&User::new("ada@example.com", "Imposter"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_patches_fields() {
        let store = MemoryUserStore::new();
        let created = store.create(&User::new("ada@example.com", "Ada")).await.unwrap();

        let updated = store
            .update(
                created.id,
                &UserPatch {
                    name: Some("Ada Lovelace".into()),
                    password_hash: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.email, "ada@example.com");

        let err = store.update(999, &UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}
