//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;

use marquee_auth::{AuthState, TokenService, UserCache, UserStore};
use marquee_storage::{AuditoriumStore, CinemaStore, ShowStore};

/// Application state shared by every handler.
///
/// All members are `Arc`'d, injected at construction rather than reached for
/// globally, so handlers and middleware stay testable with stub stores.
#[derive(Clone)]
pub struct AppState {
    /// State consumed by the authentication middleware.
    pub auth: AuthState,

    /// Read-through cache over the user store.
    pub users: Arc<UserCache>,

    /// Token service for register/login.
    pub tokens: Arc<TokenService>,

    /// Direct user store access for registration.
    pub user_store: Arc<dyn UserStore>,

    pub cinemas: Arc<dyn CinemaStore>,
    pub auditoriums: Arc<dyn AuditoriumStore>,
    pub shows: Arc<dyn ShowStore>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
