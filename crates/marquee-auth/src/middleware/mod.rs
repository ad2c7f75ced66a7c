//! Axum middleware for authentication and role-based authorization.
//!
//! The gate runs as a chain: [`require_auth`] resolves the caller identity
//! through the read-through user cache and attaches a [`Requester`] to the
//! request; [`require_role`] checks that identity against the route's allowed
//! roles; handlers receive the identity via the [`CurrentUser`] extractor.

mod auth;
mod error;
mod types;

pub use auth::{AuthState, CurrentUser, require_auth, require_role};
pub use types::Requester;
