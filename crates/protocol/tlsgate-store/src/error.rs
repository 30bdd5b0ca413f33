//! Error types for the storage layer.

use thiserror::Error;
use tlsgate_crypto::{Address, Hash};
use tlsgate_types::{Amount, GatewayId, ProverId};

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Holder's balance does not cover a transfer.
    #[error("insufficient balance of {token} for {holder}: have {balance}, need {needed}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        balance: Amount,
        needed: Amount,
    },

    /// Spender's allowance does not cover a transfer.
    #[error("insufficient allowance of {token} from {owner} to {spender}: have {allowance}, need {needed}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        allowance: Amount,
        needed: Amount,
    },

    /// Checked arithmetic overflowed.
    #[error("store counter overflow")]
    Overflow,

    /// Request not found in store.
    #[error("request not found: {0}")]
    RequestNotFound(Hash),

    /// A request with this id already exists.
    #[error("duplicate request id: {0}")]
    DuplicateRequest(Hash),

    /// Prover not found in registry.
    #[error("prover not found: {0}")]
    ProverNotFound(ProverId),

    /// Gateway id not registered.
    #[error("gateway id not registered: {0}")]
    GatewayNotFound(GatewayId),
}
