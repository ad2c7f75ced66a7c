//! Application state construction.

use std::sync::Arc;

use marquee_auth::{
    AuthState, CacheStore, MemoryCacheStore, Role, TokenService, User, UserCache, UserStore,
};
use marquee_db_memory::{
    MemoryAuditoriumStore, MemoryCinemaStore, MemoryShowStore, MemoryUserStore,
};

use crate::cache::RedisCacheStore;
use crate::config::AppConfig;
use crate::password;
use crate::state::AppState;

/// Builds application state from configuration: picks the cache backend,
/// wires the read-through user cache and token service, and seeds the
/// bootstrap admin account.
///
/// # Errors
///
/// Returns an error if the Redis pool cannot be configured or the admin
/// account cannot be created.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let cache: Arc<dyn CacheStore> = if cfg.redis.enabled {
        tracing::info!(url = %cfg.redis.url, "using Redis cache backend");
        Arc::new(RedisCacheStore::connect(&cfg.redis.url)?)
    } else {
        tracing::info!("using in-process cache backend");
        Arc::new(MemoryCacheStore::new())
    };

    let user_store = Arc::new(MemoryUserStore::new());
    seed_admin(cfg, user_store.as_ref()).await?;
    let user_store: Arc<dyn UserStore> = user_store;

    let users = Arc::new(UserCache::new(
        cache,
        user_store.clone(),
        cfg.auth.cache_ttl,
    ));
    let tokens = Arc::new(TokenService::new(&cfg.auth.secret, cfg.auth.token_ttl));
    let auth = AuthState::new(tokens.clone(), users.clone());

    Ok(AppState {
        auth,
        users,
        tokens,
        user_store,
        cinemas: Arc::new(MemoryCinemaStore::new()),
        auditoriums: Arc::new(MemoryAuditoriumStore::new()),
        shows: Arc::new(MemoryShowStore::new()),
    })
}

async fn seed_admin(cfg: &AppConfig, store: &dyn UserStore) -> anyhow::Result<()> {
    let Some(admin) = &cfg.bootstrap.admin else {
        return Ok(());
    };
    if store.find_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    let name = if admin.name.is_empty() {
        "Administrator".to_string()
    } else {
        admin.name.clone()
    };
    let user = User::builder(admin.email.clone())
        .name(name)
        .role(Role::Admin)
        .password_hash(password::hash(&admin.password)?)
        .build();
    let created = store.create(&user).await?;
    tracing::info!(user_id = created.id, "bootstrap admin created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapAdmin;

    fn base_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.auth.secret = "0123456789abcdef0123456789abcdef".into();
        cfg
    }

    #[tokio::test]
    async fn test_build_state_without_admin() {
        let state = build_state(&base_config()).await.unwrap();
        assert!(state.user_store.find_by_email("root@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_seeded_once() {
        let mut cfg = base_config();
        cfg.bootstrap.admin = Some(BootstrapAdmin {
            email: "root@example.com".into(),
            name: String::new(),
            password: "correct-horse".into(),
        });

        let state = build_state(&cfg).await.unwrap();
        let admin = state
            .user_store
            .find_by_email("root@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "Administrator");
        assert!(admin.password_hash.is_some());

        // Seeding again against the same store is a no-op.
        seed_admin(&cfg, state.user_store.as_ref()).await.unwrap();
        assert!(state.user_store.find_by_id(admin.id).await.unwrap().is_some());
    }
}
