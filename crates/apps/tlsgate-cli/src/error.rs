//! CLI error types.

use thiserror::Error;
use tlsgate_types::ErrorCode;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("{0}")]
    Config(#[from] tlsgate_ops::ConfigError),

    /// Protocol operation error.
    #[error("{0}")]
    Gateway(#[from] tlsgate_ops::GatewayError),

    /// Malformed address or key.
    #[error("{0}")]
    Crypto(#[from] tlsgate_crypto::CryptoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Invalid hex argument.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),
}

impl CliError {
    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Config(_) | Self::Toml(_) => 3,
            Self::Gateway(_) => 8,
            Self::Json(_) | Self::InvalidHex(_) | Self::Crypto(_) => 10,
        }
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Gateway(e) => e.code(),
            Self::Crypto(_) | Self::InvalidHex(_) => ErrorCode::InvalidRequest,
            Self::Config(_) | Self::Toml(_) | Self::Json(_) | Self::User(_) => {
                ErrorCode::InternalError
            }
        }
    }
}
