//! JWT Secret loading
//!
//! The signing secret is supplied out-of-band, either through an environment
//! variable or a file readable only by the service. There is no built-in
//! default: a missing secret is a startup configuration error.

use crate::config::get_env_with_fallback;
use flag_service_common::error::CommonError;
use std::fs;
use std::path::Path;

/// Environment variable holding the secret
pub const JWT_SECRET_ENV: &str = "FLAG_SERVICE_JWT_SECRET";
/// Deprecated environment variable holding the secret
const LEGACY_JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Environment variable holding a path to a file containing the secret
pub const JWT_SECRET_FILE_ENV: &str = "FLAG_SERVICE_JWT_SECRET_FILE";

/// Secrets shorter than this are accepted but logged as weak
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Load the JWT secret
///
/// Priority:
/// 1. Environment variable `FLAG_SERVICE_JWT_SECRET` (or deprecated `JWT_SECRET`)
/// 2. File named by `FLAG_SERVICE_JWT_SECRET_FILE`
///
/// # Returns
/// * `Ok(secret)` - The JWT secret string
/// * `Err(CommonError::Config)` - No secret configured, or the file could not be read
pub fn load_jwt_secret() -> Result<String, CommonError> {
    if let Some(secret) = get_env_with_fallback(JWT_SECRET_ENV, LEGACY_JWT_SECRET_ENV) {
        if !secret.is_empty() {
            tracing::info!("Using JWT secret from environment variable");
            return Ok(checked(secret));
        }
    }

    if let Ok(path) = std::env::var(JWT_SECRET_FILE_ENV) {
        let secret = read_secret_file(Path::new(&path))?;
        if !secret.is_empty() {
            tracing::info!("Using JWT secret from file: {}", path);
            return Ok(checked(secret));
        }
        return Err(CommonError::Config(format!("JWT secret file is empty: {}", path)));
    }

    Err(CommonError::Config(format!(
        "JWT secret is not configured; set {} or {}",
        JWT_SECRET_ENV, JWT_SECRET_FILE_ENV
    )))
}

fn checked(secret: String) -> String {
    if secret.len() < RECOMMENDED_SECRET_LEN {
        tracing::warn!(
            "JWT secret is shorter than {} bytes; use a longer random value",
            RECOMMENDED_SECRET_LEN
        );
    }
    secret
}

/// Read the secret from file
fn read_secret_file(path: &Path) -> Result<String, CommonError> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            CommonError::Config(format!(
                "Failed to read JWT secret file {}: {}",
                path.display(),
                e
            ))
        })
}
