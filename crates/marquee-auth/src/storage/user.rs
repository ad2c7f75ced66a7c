//! User types and the user store trait.
//!
//! The user store is an external collaborator backed by a relational
//! database. Implementations are provided by storage backends.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use marquee_core::model::SimpleUser;

use crate::AuthResult;

/// Default datetime value for deserialization when the field is missing.
fn default_datetime() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

// =============================================================================
// Role
// =============================================================================

/// The closed set of user roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    CinemaOwner,
    #[default]
    User,
}

impl Role {
    /// The wire/storage form of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::CinemaOwner => "cinema_owner",
            Self::User => "user",
        }
    }

    /// Returns `true` for roles allowed to manage catalog entities.
    #[must_use]
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::CinemaOwner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "cinema_owner" => Ok(Self::CinemaOwner),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// This is the identity snapshot that the read-through cache serializes;
/// fields added here are cached copies until the entry expires or is
/// invalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned numeric id. Stable, never reused.
    #[serde(default)]
    pub id: i64,

    /// Email address; unique, also used as an alternate lookup key.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Argon2-hashed password (None for accounts without local credentials).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Authorization role.
    #[serde(default)]
    pub role: Role,

    /// Whether the account may authenticate.
    pub active: bool,

    /// When the user was created.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the user was last updated.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a new active user with the `user` role and no id assigned yet.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: 0,
            email: email.into(),
            name: name.into(),
            password_hash: None,
            role: Role::User,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new user builder.
    #[must_use]
    pub fn builder(email: impl Into<String>) -> UserBuilder {
        UserBuilder::new(email)
    }

    /// Returns `true` if the account may authenticate.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` if the user holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// The outward-facing view of this user, ready for masking.
    #[must_use]
    pub fn to_simple(&self) -> SimpleUser {
        SimpleUser {
            id: self.id,
            public_id: None,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.as_str().to_string(),
        }
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builder for creating `User` instances.
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    fn new(email: impl Into<String>) -> Self {
        Self {
            user: User::new(email, String::new()),
        }
    }

    /// Sets the user id.
    #[must_use]
    pub fn id(mut self, id: i64) -> Self {
        self.user.id = id;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.user.name = name.into();
        self
    }

    /// Sets the password hash.
    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.user.password_hash = Some(hash.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.user.role = role;
        self
    }

    /// Sets whether the account is active.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.user.active = active;
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        self.user
    }
}

// =============================================================================
// Patch
// =============================================================================

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

// =============================================================================
// User Store Trait
// =============================================================================

/// Storage operations for users.
///
/// Lookups return `Ok(None)` for absence; errors are reserved for transport
/// failures, which the cache layer treats as transient.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by numeric id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>>;

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Creates a user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered, or an error if
    /// the storage operation fails.
    async fn create(&self, user: &User) -> AuthResult<User>;

    /// Applies a patch to an existing user and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the user does not exist, or an error if the
    /// storage operation fails.
    async fn update(&self, id: i64, patch: &UserPatch) -> AuthResult<User>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new("ada@example.com", "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::User);
        assert!(user.active);
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn test_user_builder() {
        let user = User::builder("owner@example.com")
            .id(7)
            .name("Grace")
            .role(Role::CinemaOwner)
            .password_hash("$argon2id$...")
            .build();

        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Grace");
        assert!(user.has_role(Role::CinemaOwner));
        assert!(user.role.is_privileged());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("cinema_owner".parse::<Role>().unwrap(), Role::CinemaOwner);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_form() {
        let json = serde_json::to_string(&Role::CinemaOwner).unwrap();
        assert_eq!(json, "\"cinema_owner\"");
    }

    #[test]
    fn test_to_simple_carries_raw_id_unmasked() {
        let user = User::builder("ada@example.com").id(42).name("Ada").build();
        let simple = user.to_simple();
        assert_eq!(simple.id, 42);
        assert!(simple.public_id.is_none());
        assert_eq!(simple.role, "user");
    }

    #[test]
    fn test_user_roundtrips_through_json() {
        let user = User::builder("ada@example.com")
            .id(42)
            .name("Ada")
            .role(Role::Admin)
            .build();
        let bytes = serde_json::to_vec(&user).unwrap();
        let back: User = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, user);
    }
}
