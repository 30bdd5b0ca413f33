//! Meta-transaction types.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::Address;

use crate::{Amount, Gas};

/// A call signed off-chain by `from` and relayed by a forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForwardRequest {
    /// Signer on whose behalf the call is made
    pub from: Address,
    /// Call target
    pub to: Address,
    /// Value attached to the call
    pub value: Amount,
    /// Gas stipend for the call
    pub gas: Gas,
    /// Must equal the forwarder's next nonce for `from`
    pub nonce: u64,
    /// Calldata
    pub data: Vec<u8>,
}

/// Result of relaying a forward request.
///
/// A failed callee still consumes the sender's nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForwardOutcome {
    /// Whether the callee succeeded
    pub success: bool,
    /// Callee return data (empty on failure)
    pub return_data: Vec<u8>,
    /// Gas consumed by the callee
    pub gas_used: Gas,
}
