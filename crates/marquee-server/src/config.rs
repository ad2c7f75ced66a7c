//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use marquee_auth::AuthConfig;
use serde::{Deserialize, Serialize};

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The underlying source could not be read or parsed.
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    /// The configuration parsed but failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub redis: RedisConfig,

    /// Authentication and authorization configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Bootstrap configuration (initial admin user).
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".into()));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.body_limit_bytes must be > 0".into(),
            ));
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        if self.redis.enabled && self.redis.url.is_empty() {
            return Err(ConfigError::Invalid(
                "redis.enabled=true requires redis.url".into(),
            ));
        }
        self.auth
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let Some(admin) = &self.bootstrap.admin {
            if admin.email.is_empty() || admin.password.len() < 8 {
                return Err(ConfigError::Invalid(
                    "bootstrap.admin requires an email and a password of at least 8 characters"
                        .into(),
                ));
            }
        }
        Ok(())
    }

    /// Socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Remote cache settings. When disabled, the in-process cache backend is
/// used instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub url: String,
}

/// Initial admin account seeded at startup if no user with that email
/// exists yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admin: Option<BootstrapAdmin>,
}

/// Credentials for the seeded admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
}

/// Loads configuration from an optional TOML file plus `MARQUEE`-prefixed
/// environment variables (e.g. `MARQUEE_AUTH__SECRET`).
///
/// # Errors
///
/// Returns an error if a source fails to parse or validation fails.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path).required(false));
    }
    let cfg: AppConfig = builder
        .add_source(config::Environment::with_prefix("MARQUEE").separator("__"))
        .build()?
        .try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}
