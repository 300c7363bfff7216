//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STEAM_API_ROOT` - Steam Web API root URL (e.g., <https://api.steampowered.com>)
//! - `STEAM_API_KEY` - Steam Web API key
//!
//! ## Optional
//! - `GAME_NIGHT_HOST` - Bind address (default: 127.0.0.1)
//! - `GAME_NIGHT_PORT` - Listen port (default: 9876)
//! - `CONFIRMATION_TIMEOUT_SECS` - Lifetime of a pending registration (default: 300)
//! - `CACHE_RESET_PERIOD_SECS` - Owned-games cache reset period (default: 3600)
//! - `ALLOW_PLAYER_DELETION` - Enable `DELETE /api/players` (default: false)
//! - `REGISTRY_PATH` - File holding the registered ids (default: steamids.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Game Night server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Steam Web API configuration
    pub steam: SteamApiConfig,
    /// How long a registration may sit unconfirmed
    pub confirmation_timeout: Duration,
    /// How often the owned-games aggregate is cleared
    pub cache_reset_period: Duration,
    /// Whether the delete endpoint is enabled
    pub allow_player_deletion: bool,
    /// File the registered ids are persisted to
    pub registry_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Steam Web API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SteamApiConfig {
    /// API root URL
    pub api_root: Url,
    /// API key, sent with every upstream call
    pub api_key: SecretString,
}

impl std::fmt::Debug for SteamApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamApiConfig")
            .field("api_root", &self.api_root.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("GAME_NIGHT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GAME_NIGHT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GAME_NIGHT_PORT", "9876")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GAME_NIGHT_PORT".to_string(), e.to_string()))?;

        let steam = SteamApiConfig::from_env()?;

        let confirmation_timeout = get_duration_secs("CONFIRMATION_TIMEOUT_SECS", 300)?;
        let cache_reset_period = get_duration_secs("CACHE_RESET_PERIOD_SECS", 3600)?;
        let allow_player_deletion = get_bool("ALLOW_PLAYER_DELETION", false)?;
        let registry_path = PathBuf::from(get_env_or_default("REGISTRY_PATH", "steamids.json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            steam,
            confirmation_timeout,
            cache_reset_period,
            allow_player_deletion,
            registry_path,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SteamApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_root = get_required_env("STEAM_API_ROOT")?;
        let api_root = Url::parse(&api_root)
            .map_err(|e| ConfigError::InvalidEnvVar("STEAM_API_ROOT".to_string(), e.to_string()))?;

        Ok(Self {
            api_root,
            api_key: get_required_secret("STEAM_API_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a duration, in whole seconds, with a default.
fn get_duration_secs(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

/// Get a boolean flag with a default.
fn get_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse_bool(&value).ok_or_else(|| {
            ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got '{value}'"))
        }),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean environment value.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
