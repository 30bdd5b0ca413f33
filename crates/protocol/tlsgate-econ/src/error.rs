//! Error types for tlsgate-econ

use thiserror::Error;
use tlsgate_types::{Amount, Gas};

/// Errors that can occur in fee and gas computations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EconError {
    /// Checked arithmetic overflowed
    #[error("arithmetic overflow")]
    Overflow,

    /// Offered fee is below the required fee
    #[error("insufficient fee: offered {offered}, required {required}")]
    InsufficientFee {
        /// Fee offered by the caller
        offered: Amount,
        /// Fee required by the current rate
        required: Amount,
    },

    /// Gas meter exhausted
    #[error("out of gas: limit {limit}, needed {needed}")]
    OutOfGas {
        /// Meter limit
        limit: Gas,
        /// Gas that would have been used
        needed: Gas,
    },

    /// Division by a zero bytes-per-token rate
    #[error("bytes per token must be non-zero")]
    ZeroDivisor,
}

/// Result type for econ operations
pub type EconResult<T> = std::result::Result<T, EconError>;
