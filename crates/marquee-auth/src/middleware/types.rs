//! Request identity types.

use std::sync::Arc;

use crate::storage::{Role, User};

/// The resolved identity of the caller, attached to the request by the
/// authentication middleware.
///
/// The user snapshot is wrapped in `Arc` so cloning into request extensions
/// and handlers stays cheap.
#[derive(Debug, Clone)]
pub struct Requester {
    user: Arc<User>,
}

impl Requester {
    /// Wraps a resolved user.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            user: Arc::new(user),
        }
    }

    /// Numeric user id.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// Authorization role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Returns `true` for roles allowed to manage catalog entities; drives
    /// the `privileged` flag of the masking step.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.user.role.is_privileged()
    }

    /// The full user snapshot.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}
