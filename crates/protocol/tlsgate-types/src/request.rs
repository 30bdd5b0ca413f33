//! Request types.
//!
//! A request moves through `Submitted -> Delivered` or `Submitted -> Expired`.
//! Only a [`RequestRecord`] is kept after submission; the full template is
//! authenticated at delivery time through the bound request hash.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::{Address, Hash, Timestamp};

use crate::{Amount, Gas, ProverId};

/// A request built from a template.
///
/// `fields[i]` tags the slot that `values[i]` fills in the request template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplatedRequest {
    /// Hash of the request template
    pub request_template_hash: Hash,
    /// Hash of the response template the prover must match
    pub response_template_hash: Hash,
    /// Field tags, one per value
    pub fields: Vec<u64>,
    /// Field values
    pub values: Vec<Vec<u8>>,
}

impl TemplatedRequest {
    /// Create a new templated request.
    pub fn new(
        request_template_hash: Hash,
        response_template_hash: Hash,
        fields: Vec<u64>,
        values: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            request_template_hash,
            response_template_hash,
            fields,
            values,
        }
    }
}

/// A submission to a request gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRequest {
    /// Prover expected to attest to the response, if any
    pub prover_id: Option<ProverId>,
    /// Remote endpoint
    pub remote: String,
    /// TLS server name
    pub server_name: String,
    /// Key material encrypted for the prover (may be empty)
    pub encrypted_key: Vec<u8>,
    /// The templated request
    pub template: TemplatedRequest,
    /// Fee offered, in payment token base units
    pub fee: Amount,
    /// Upper bound on delivered response size
    pub max_response_bytes: u64,
    /// Callback gas stipend; the gateway default applies when `None`
    pub callback_gas_limit: Option<Gas>,
}

impl SubmitRequest {
    /// Create a submission without prover, encrypted key or gas override.
    pub fn new(
        remote: impl Into<String>,
        server_name: impl Into<String>,
        template: TemplatedRequest,
        fee: Amount,
        max_response_bytes: u64,
    ) -> Self {
        Self {
            prover_id: None,
            remote: remote.into(),
            server_name: server_name.into(),
            encrypted_key: Vec::new(),
            template,
            fee,
            max_response_bytes,
            callback_gas_limit: None,
        }
    }

    /// Route the request to a prover.
    pub fn with_prover(mut self, prover_id: ProverId) -> Self {
        self.prover_id = Some(prover_id);
        self
    }

    /// Attach encrypted key material.
    pub fn with_encrypted_key(mut self, encrypted_key: Vec<u8>) -> Self {
        self.encrypted_key = encrypted_key;
        self
    }

    /// Override the callback gas stipend.
    pub fn with_callback_gas_limit(mut self, gas: Gas) -> Self {
        self.callback_gas_limit = Some(gas);
        self
    }

    /// Replace the offered fee.
    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }
}

/// Which fields the request hash binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestHashBinding {
    /// `abi.encode(remote, server_name, encrypted_key, request_template_hash, fields, values)`
    #[default]
    Template,
    /// `abi.encode(request_id, requester, encrypted_key, nonce)`
    Compact,
}

/// Lifecycle state of a request. Absence from the store means NONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Submitted and awaiting delivery
    Submitted,
    /// Response delivered (terminal)
    Delivered,
    /// Deadline passed and fee refunded (terminal)
    Expired,
}

impl RequestState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Expired)
    }
}

/// Stored state of a submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestRecord {
    /// keccak256(gateway || requester || nonce)
    pub request_id: Hash,
    /// Gateway the request was submitted to
    pub gateway: Address,
    /// Account proxy that submitted the request
    pub requester: Address,
    /// Per-(gateway, requester) nonce consumed by this request
    pub nonce: u64,
    /// Bound request hash
    pub request_hash: Hash,
    /// Binding used to derive `request_hash`
    pub binding: RequestHashBinding,
    /// Prover that must attest to the response, if any
    pub prover_id: Option<ProverId>,
    /// Upper bound on delivered response size
    pub max_response_bytes: u64,
    /// Fee charged at submission
    pub fee_paid: Amount,
    /// Token the fee was charged in
    pub payment_token: Address,
    /// Callback gas stipend
    pub callback_gas_limit: Gas,
    /// Submission time
    pub submitted_at: Timestamp,
    /// Expiry deadline, if expiry is enabled
    pub deadline: Option<Timestamp>,
    /// Current state
    pub state: RequestState,
}

impl RequestRecord {
    /// Whether the request still awaits delivery.
    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Submitted
    }

    /// Whether the deadline has passed at `now`.
    pub fn deadline_passed(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
