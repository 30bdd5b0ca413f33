//! Error types for the operations layer.
//!
//! Every public operation returns [`GatewayResult`]. Foundation-crate errors
//! are wrapped with `#[from]` and mapped onto the stable [`ErrorCode`]
//! taxonomy by [`GatewayError::code`].

use thiserror::Error;
use tlsgate_crypto::{Address, CryptoError, Hash};
use tlsgate_econ::EconError;
use tlsgate_store::StoreError;
use tlsgate_types::{ErrorCode, Gas, GatewayId, ProverId};
use tlsgate_valid::ValidationError;

/// Result type for operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GatewayError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    /// No request with this id was ever submitted.
    #[error("unknown request: {0}")]
    UnknownRequest(Hash),

    /// The request was already delivered.
    #[error("request already delivered: {0}")]
    AlreadyDelivered(Hash),

    /// The request expired before delivery.
    #[error("request expired: {0}")]
    RequestExpired(Hash),

    /// The request has not reached its deadline yet.
    #[error("request {request_id} not expired until {deadline}")]
    NotExpired {
        /// Request id
        request_id: Hash,
        /// Deadline in milliseconds
        deadline: u64,
    },

    /// Requests carry no deadline under the current configuration.
    #[error("request expiry is disabled")]
    ExpiryDisabled,

    /// Supplied request hash differs from the bound hash.
    #[error("request hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// Hash bound at submission
        expected: Hash,
        /// Hash supplied by the gateway
        actual: Hash,
    },

    /// The prover rejected the delivery proof.
    #[error("invalid proof for request {0}")]
    InvalidProof(Hash),

    /// The response handler reverted.
    #[error("callback failed: {0}")]
    CallbackFailed(String),

    /// The response handler exhausted its gas limit.
    #[error("callback out of gas: limit {limit}")]
    OutOfGas {
        /// Callback gas limit of the request
        limit: Gas,
    },

    // =========================================================================
    // Registry Errors
    // =========================================================================
    /// Prover id not registered.
    #[error("unknown prover: {0}")]
    UnknownProver(ProverId),

    /// Prover still has requests in flight.
    #[error("prover {prover_id} has {in_flight} requests in flight")]
    ProverInUse {
        /// Prover id
        prover_id: ProverId,
        /// Number of pending requests referencing it
        in_flight: u64,
    },

    /// External verifier name not registered.
    #[error("unknown verifier: {0}")]
    UnknownVerifier(String),

    /// Gateway id or address not registered.
    #[error("unknown gateway: {0}")]
    UnknownGateway(String),

    /// No account beacon configured.
    #[error("account beacon not set")]
    BeaconNotSet,

    /// Caller is not allowed to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(Address),

    /// The operation would leave the protocol without an owner.
    #[error("new owner is the zero address")]
    ZeroOwner,

    // =========================================================================
    // Forwarder Errors
    // =========================================================================
    /// Signature does not recover to `from`.
    #[error("signature does not match signer {0}")]
    InvalidSignature(Address),

    /// Forward request nonce is not the signer's next nonce.
    #[error("invalid nonce: expected {expected}, got {actual}")]
    InvalidNonce {
        /// Next nonce of the signer
        expected: u64,
        /// Nonce in the request
        actual: u64,
    },

    /// No call target registered at the address.
    #[error("unknown call target: {0}")]
    UnknownTarget(Address),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Economics error.
    #[error("econ error: {0}")]
    Econ(#[from] EconError),

    /// Crypto error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl GatewayError {
    /// Create an unknown gateway error from a gateway id.
    pub fn unknown_gateway_id(gateway_id: GatewayId) -> Self {
        GatewayError::UnknownGateway(format!("id {}", gateway_id))
    }

    /// Create an unknown gateway error from an address.
    pub fn unknown_gateway(gateway: &Address) -> Self {
        GatewayError::UnknownGateway(gateway.to_string())
    }

    /// Get the protocol error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownRequest(_) => ErrorCode::UnknownRequest,
            Self::AlreadyDelivered(_) => ErrorCode::AlreadyDelivered,
            Self::RequestExpired(_) => ErrorCode::RequestExpired,
            Self::NotExpired { .. } => ErrorCode::InvalidRequest,
            Self::ExpiryDisabled => ErrorCode::ExpiryDisabled,
            Self::HashMismatch { .. } => ErrorCode::HashMismatch,
            Self::InvalidProof(_) => ErrorCode::InvalidProof,
            Self::CallbackFailed(_) => ErrorCode::CallbackFailed,
            Self::OutOfGas { .. } => ErrorCode::OutOfGas,

            Self::UnknownProver(_) => ErrorCode::UnknownProver,
            Self::ProverInUse { .. } => ErrorCode::ProverInUse,
            Self::UnknownVerifier(_) => ErrorCode::UnknownVerifier,
            Self::UnknownGateway(_) => ErrorCode::UnknownGateway,
            Self::BeaconNotSet => ErrorCode::BeaconNotSet,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::ZeroOwner => ErrorCode::InvalidRequest,

            Self::InvalidSignature(_) => ErrorCode::InvalidSignature,
            Self::InvalidNonce { .. } => ErrorCode::InvalidNonce,
            Self::UnknownTarget(_) => ErrorCode::UnknownTarget,

            // Wrapped errors
            Self::Validation(e) => e.error_code(),
            Self::Store(e) => match e {
                StoreError::InsufficientBalance { .. } | StoreError::InsufficientAllowance { .. } => {
                    ErrorCode::InsufficientBalance
                }
                StoreError::Overflow => ErrorCode::Overflow,
                StoreError::RequestNotFound(_) => ErrorCode::UnknownRequest,
                StoreError::ProverNotFound(_) => ErrorCode::UnknownProver,
                StoreError::GatewayNotFound(_) => ErrorCode::UnknownGateway,
                StoreError::DuplicateRequest(_) => ErrorCode::InternalError,
            },
            Self::Econ(e) => match e {
                EconError::Overflow => ErrorCode::Overflow,
                EconError::InsufficientFee { .. } => ErrorCode::InsufficientFee,
                EconError::OutOfGas { .. } => ErrorCode::OutOfGas,
                EconError::ZeroDivisor => ErrorCode::InvalidRequest,
            },
            Self::Crypto(_) => ErrorCode::InvalidSignature,
        }
    }

    /// Get a user-facing suggestion for recovering from this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        self.code().suggestion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlsgate_crypto::keccak256;

    #[test]
    fn test_wrapped_codes() {
        let err: GatewayError = EconError::InsufficientFee {
            offered: 1,
            required: 2,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InsufficientFee);

        let err: GatewayError = EconError::Overflow.into();
        assert_eq!(err.code(), ErrorCode::Overflow);

        let err: GatewayError = StoreError::InsufficientBalance {
            token: Address([1; 20]),
            holder: Address([2; 20]),
            balance: 0,
            needed: 1,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InsufficientBalance);

        let err: GatewayError = ValidationError::ResponseTooLarge { len: 2, max: 1 }.into();
        assert_eq!(err.code(), ErrorCode::ResponseTooLarge);

        let err: GatewayError = ValidationError::EmptyRemote.into();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_direct_codes() {
        let id = keccak256(b"id");
        assert_eq!(
            GatewayError::UnknownRequest(id).code(),
            ErrorCode::UnknownRequest
        );
        assert_eq!(
            GatewayError::HashMismatch {
                expected: id,
                actual: keccak256(b"other"),
            }
            .code(),
            ErrorCode::HashMismatch
        );
        assert_eq!(
            GatewayError::InvalidNonce {
                expected: 1,
                actual: 0
            }
            .code(),
            ErrorCode::InvalidNonce
        );
        assert_eq!(
            GatewayError::unknown_gateway_id(7).code(),
            ErrorCode::UnknownGateway
        );
    }

    #[test]
    fn test_display() {
        let err: GatewayError = EconError::InsufficientFee {
            offered: 5,
            required: 10,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "econ error: insufficient fee: offered 5, required 10"
        );
        assert!(err.suggestion().is_some());
    }
}
