//! Validation error types.

use thiserror::Error;
use tlsgate_types::ErrorCode;

/// Reasons an input fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // =========================================================================
    // Submission
    // =========================================================================
    /// Template fields and values differ in length
    #[error("template has {fields} fields but {values} values")]
    FieldValueMismatch {
        /// Number of fields
        fields: usize,
        /// Number of values
        values: usize,
    },

    /// Too many template fields
    #[error("too many template fields: {count} (max {max})")]
    TooManyFields {
        /// Fields supplied
        count: usize,
        /// Limit
        max: usize,
    },

    /// Remote endpoint is empty
    #[error("remote is empty")]
    EmptyRemote,

    /// Remote endpoint exceeds the length limit
    #[error("remote too long: {len} (max {max})")]
    RemoteTooLong {
        /// Length supplied
        len: usize,
        /// Limit
        max: usize,
    },

    /// Server name is empty
    #[error("server name is empty")]
    EmptyServerName,

    /// Server name exceeds the length limit
    #[error("server name too long: {len} (max {max})")]
    ServerNameTooLong {
        /// Length supplied
        len: usize,
        /// Limit
        max: usize,
    },

    /// Encrypted key exceeds the length limit
    #[error("encrypted key too long: {len} (max {max})")]
    EncryptedKeyTooLong {
        /// Length supplied
        len: usize,
        /// Limit
        max: usize,
    },

    /// `max_response_bytes` is zero
    #[error("max response bytes must be non-zero")]
    ZeroMaxResponseBytes,

    /// `max_response_bytes` exceeds the gateway limit
    #[error("max response bytes {requested} exceeds limit {max}")]
    MaxResponseBytesTooLarge {
        /// Value requested
        requested: u64,
        /// Limit
        max: u64,
    },

    /// Callback gas limit set to zero
    #[error("callback gas limit must be non-zero")]
    ZeroCallbackGas,

    // =========================================================================
    // Delivery
    // =========================================================================
    /// Response exceeds the request's `max_response_bytes`
    #[error("response too large: {len} bytes (max {max})")]
    ResponseTooLarge {
        /// Response length
        len: u64,
        /// Request limit
        max: u64,
    },

    /// Proof exceeds the length limit
    #[error("proof too large: {len} bytes (max {max})")]
    ProofTooLarge {
        /// Proof length
        len: usize,
        /// Limit
        max: usize,
    },

    // =========================================================================
    // Forwarding
    // =========================================================================
    /// Forward target is the zero address
    #[error("forward target is the zero address")]
    ZeroForwardTarget,

    /// Forward calldata exceeds the length limit
    #[error("forward data too large: {len} bytes (max {max})")]
    ForwardDataTooLarge {
        /// Data length
        len: usize,
        /// Limit
        max: usize,
    },
}

impl ValidationError {
    /// Map to the protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ValidationError::ResponseTooLarge { .. } => ErrorCode::ResponseTooLarge,
            _ => ErrorCode::InvalidRequest,
        }
    }
}

/// Result type for validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
