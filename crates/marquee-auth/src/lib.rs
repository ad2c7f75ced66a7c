//! # marquee-auth
//!
//! Identity resolution and authorization for the Marquee server.
//!
//! Nearly every authenticated request flows through this crate: the bearer
//! token is verified, the claimed user is resolved through a read-through
//! cache in front of the user store, and the resolved identity is checked
//! against the route's allowed roles before the handler runs.
//!
//! ## Modules
//!
//! - [`config`] - Authentication configuration (secret, TTLs)
//! - [`token`] - Bearer token issuing and verification
//! - [`storage`] - User types and the `UserStore` trait
//! - [`cache`] - Cache store seam and the read-through user cache
//! - [`middleware`] - Axum authentication middleware and role gate

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod storage;
pub mod token;

pub use cache::{CacheStats, CacheStore, MemoryCacheStore, UserCache};
pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use middleware::{AuthState, CurrentUser, Requester, require_auth, require_role};
pub use storage::{Role, User, UserBuilder, UserPatch, UserStore};
pub use token::{AccessTokenClaims, TokenService};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
