//! Capability traits the protocol calls out to.
//!
//! The protocol never interprets responses or forwarded calldata itself.
//! Account proxies supply a [`ResponseHandler`], external proof systems a
//! [`ResponseVerifier`], and forward targets a [`CallTarget`]. Handlers and
//! targets run under a [`GasMeter`] and report exhaustion by returning the
//! meter's error.

use thiserror::Error;
use tlsgate_crypto::{Address, Hash};
use tlsgate_econ::{EconError, GasMeter};
use tlsgate_types::Amount;

/// Failure reported by a response handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The handler rejected the response.
    #[error("callback reverted: {0}")]
    Reverted(String),

    /// The handler ran out of gas or overflowed its meter.
    #[error(transparent)]
    Gas(#[from] EconError),
}

impl CallbackError {
    /// Create a revert with a reason.
    pub fn reverted(reason: impl Into<String>) -> Self {
        CallbackError::Reverted(reason.into())
    }
}

/// Failure reported by a forwarded call target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The target reverted.
    #[error("call reverted: {0}")]
    Reverted(String),

    /// Calldata did not decode for the target.
    #[error("bad calldata: {0}")]
    BadCalldata(String),

    /// The target ran out of gas.
    #[error(transparent)]
    Gas(#[from] EconError),
}

/// Receives delivered responses for an account proxy.
pub trait ResponseHandler: Send + Sync {
    /// Handle a verified response.
    ///
    /// # Arguments
    /// * `gas` - Meter limited by the request's callback gas limit
    /// * `request_id` - Id of the delivered request
    /// * `request_hash` - Hash the request was bound to
    /// * `response` - Response bytes
    fn handle_response(
        &self,
        gas: &mut GasMeter,
        request_id: &Hash,
        request_hash: &Hash,
        response: &[u8],
    ) -> Result<(), CallbackError>;
}

/// Verifies delivery proofs for provers of kind `External`.
pub trait ResponseVerifier: Send + Sync {
    /// Check `proof` for `response` to the request bound to `request_hash`.
    fn verify(
        &self,
        request_hash: &Hash,
        response: &[u8],
        proof: &[u8],
        verification_key: &[u8],
    ) -> bool;
}

/// Call context seen by a forward target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Address submitting the forward request.
    pub relayer: Address,
    /// Value attached to the request.
    pub value: Amount,
}

/// A contract reachable through the forwarder.
///
/// Calldata arrives as `data || from`; a target trusting the forwarder takes
/// the last 20 bytes as the original sender.
pub trait CallTarget: Send + Sync {
    /// Execute a call and return its output.
    fn call(
        &self,
        ctx: &CallContext,
        gas: &mut GasMeter,
        data: &[u8],
    ) -> Result<Vec<u8>, CallError>;
}
