//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

}

/// Storage error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),
}

/// Password hashing error type
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing or digest parsing failed
    #[error("Password hash error: {0}")]
    Hash(String),
}

/// Token error type
///
/// Kept for server-side diagnostics only; callers see `AuthError::Unauthorized`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token is not a structurally valid JWT
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature does not match the server secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is past its expiry
    #[error("Token expired")]
    Expired,

    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Authentication error type (external categories)
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Username already taken
    #[error("Username already taken")]
    Conflict,

    /// Bad credentials or bad/expired/tampered token
    #[error("Unauthorized")]
    Unauthorized,

    /// Store or signing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AuthError::Conflict,
            StoreError::Database(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Result type alias (Store)
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias (Auth)
pub type AuthResult<T> = Result<T, AuthError>;
