//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and assembles the
//! [`ServerConfig`] passed explicitly into initialization.

use crate::jwt_secret::load_jwt_secret;
use flag_service_common::config::{AuthConfig, ServerConfig, StorageBackend};
use flag_service_common::error::CommonError;
use std::path::PathBuf;

/// Default data directory name (under the home directory)
const DATA_DIR: &str = ".flag-service";
/// Default SQLite database file name
const DATABASE_FILE: &str = "flags.db";

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Arguments
/// * `new_name` - The new environment variable name (preferred)
/// * `old_name` - The deprecated environment variable name (fallback)
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - Neither variable is set
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable, parsing to a specific type
///
/// # Returns
/// * `Ok(value)` - The parsed value, or `default` if the variable is unset
/// * `Err(CommonError::Config)` - The variable is set but cannot be parsed
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, CommonError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CommonError::Config(format!("Invalid value for {}: '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Build the server configuration from the process environment
///
/// | Variable | Legacy | Default |
/// |---|---|---|
/// | `FLAG_SERVICE_HOST` | - | `0.0.0.0` |
/// | `FLAG_SERVICE_PORT` | `PORT` | `8080` |
/// | `FLAG_SERVICE_STORAGE` | - | `sqlite` |
/// | `FLAG_SERVICE_DATABASE_URL` | `DATABASE_URL` | `sqlite:~/.flag-service/flags.db` |
/// | `FLAG_SERVICE_TOKEN_TTL_SECS` | - | `86400` |
/// | `FLAG_SERVICE_BCRYPT_COST` | - | `12` |
///
/// The JWT secret is loaded by [`load_jwt_secret`].
pub fn load_from_env() -> Result<ServerConfig, CommonError> {
    let host = std::env::var("FLAG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match get_env_with_fallback("FLAG_SERVICE_PORT", "PORT") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CommonError::Config(format!("Invalid port: '{}'", raw)))?,
        None => 8080,
    };

    let storage = load_storage_backend()?;

    let mut auth = AuthConfig::with_secret(load_jwt_secret()?);
    auth.token_ttl_secs = get_env_parse("FLAG_SERVICE_TOKEN_TTL_SECS", auth.token_ttl_secs)?;
    auth.bcrypt_cost = get_env_parse("FLAG_SERVICE_BCRYPT_COST", auth.bcrypt_cost)?;

    let config = ServerConfig {
        host,
        port,
        storage,
        auth,
    };
    config.validate()?;

    Ok(config)
}

fn load_storage_backend() -> Result<StorageBackend, CommonError> {
    let kind = std::env::var("FLAG_SERVICE_STORAGE").unwrap_or_else(|_| "sqlite".to_string());

    match kind.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(StorageBackend::Memory),
        "sqlite" => {
            let database_url = match get_env_with_fallback("FLAG_SERVICE_DATABASE_URL", "DATABASE_URL") {
                Some(url) => url,
                None => default_database_url()?,
            };
            Ok(StorageBackend::Sqlite { database_url })
        }
        other => Err(CommonError::Config(format!(
            "Unknown storage backend '{}': expected 'sqlite' or 'memory'",
            other
        ))),
    }
}

fn default_database_url() -> Result<String, CommonError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| CommonError::Config("Failed to resolve home directory".to_string()))?;

    let path = PathBuf::from(home).join(DATA_DIR).join(DATABASE_FILE);
    Ok(format!("sqlite:{}", path.display()))
}
