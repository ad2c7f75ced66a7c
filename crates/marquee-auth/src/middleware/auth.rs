//! Bearer authentication middleware and role gate.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::post};
//! use marquee_auth::{Role, require_auth, require_role};
//!
//! const MANAGERS: &[Role] = &[Role::Admin, Role::CinemaOwner];
//!
//! let app = Router::new()
//!     .route("/cinemas", post(create_cinema))
//!     .route_layer(middleware::from_fn(require_role(MANAGERS)))
//!     .route_layer(middleware::from_fn_with_state(auth_state, require_auth));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AuthResult;
use crate::cache::UserCache;
use crate::error::AuthError;
use crate::storage::Role;
use crate::token::TokenService;

use super::types::Requester;

// =============================================================================
// Auth State
// =============================================================================

/// State required by the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Token service for bearer verification.
    pub tokens: Arc<TokenService>,

    /// Read-through cache resolving token subjects to identities.
    pub users: Arc<UserCache>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, users: Arc<UserCache>) -> Self {
        Self { tokens, users }
    }
}

// =============================================================================
// Authentication middleware
// =============================================================================

/// Authenticates the request and attaches a [`Requester`] to it.
///
/// State machine per request: extract and verify the bearer credential
/// (failure terminates with 401), resolve the claimed user id through the
/// read-through cache (not-found terminates with 401), then hand the request
/// on with the resolved identity in its extensions.
pub async fn require_auth(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(requester) => {
            req.extensions_mut().insert(requester);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

async fn authenticate(state: &AuthState, headers: &HeaderMap) -> AuthResult<Requester> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::unauthorized("Invalid Authorization header format"))?;

    let claims = state.tokens.verify(token)?;

    let user = match state.users.get_by_id(claims.sub).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound) => {
            // The subject was deleted after the token was issued.
            tracing::debug!(user_id = claims.sub, "token subject no longer exists");
            return Err(AuthError::unauthorized("Unknown user"));
        }
        Err(err) => return Err(err),
    };

    if !user.is_active() {
        tracing::warn!(user_id = user.id, "inactive user presented a valid token");
        return Err(AuthError::unauthorized("User is inactive"));
    }

    tracing::debug!(user_id = user.id, role = %user.role, "request authenticated");
    Ok(Requester::new(user))
}

// =============================================================================
// Role gate
// =============================================================================

/// Builds a route layer that admits only the given roles.
///
/// Must run after [`require_auth`]; a missing identity is a wiring bug and
/// yields 500 rather than a silent pass.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |req, next| Box::pin(role_gate(allowed, req, next))
}

async fn role_gate(allowed: &'static [Role], req: Request, next: Next) -> Response {
    let Some(requester) = req.extensions().get::<Requester>() else {
        tracing::error!("role gate mounted without authentication middleware");
        return AuthError::internal("authentication context missing").into_response();
    };

    if !allowed.contains(&requester.role()) {
        tracing::debug!(
            user_id = requester.user_id(),
            role = %requester.role(),
            "role not allowed for this route"
        );
        return AuthError::forbidden(format!(
            "role {} may not access this resource",
            requester.role()
        ))
        .into_response();
    }

    next.run(req).await
}

// =============================================================================
// Current user extractor
// =============================================================================

/// Extractor handing handlers the identity resolved by [`require_auth`].
pub struct CurrentUser(pub Requester);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Requester>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AuthError::internal("authentication context missing"))
    }
}

// =============================================================================
// Tests
// =============================================================================
