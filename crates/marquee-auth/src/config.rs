//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors produced when validating authentication configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is missing or out of range.
    #[error("invalid auth configuration: {0}")]
    Invalid(String),
}

fn default_token_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret for bearer tokens.
    #[serde(default)]
    pub secret: String,

    /// Lifetime of issued bearer tokens.
    #[serde(default = "default_token_ttl", with = "humantime_serde")]
    pub token_ttl: Duration,

    /// Time-to-live for cached identity entries.
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl: default_token_ttl(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is missing or too short, or a TTL is
    /// zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < 16 {
            return Err(ConfigError::Invalid(
                "auth.secret must be at least 16 characters".into(),
            ));
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::Invalid("auth.token_ttl must be > 0".into()));
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::Invalid("auth.cache_ttl must be > 0".into()));
        }
        Ok(())
    }
}
