//! Events emitted by protocol transitions.
//!
//! Events are the observable boundary of the protocol: off-chain provers
//! watch `RequestBegin` to pick up work, and clients watch `RequestEnd` for
//! delivered responses. A failed transition emits nothing.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::{Address, Hash};

use crate::{Amount, Gas, GatewayId, ProverId, VerifierKind};

/// A protocol event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A request was accepted
    RequestBegin {
        request_id: Hash,
        gateway: Address,
        requester: Address,
        prover_id: Option<ProverId>,
        request_template_hash: Hash,
        response_template_hash: Hash,
        remote: String,
        server_name: String,
        encrypted_key: Vec<u8>,
        max_response_bytes: u64,
        fee: Amount,
    },
    /// A response was delivered and the callback completed
    RequestEnd { request_id: Hash, gas_used: Gas },
    /// A request passed its deadline and its fee was refunded
    RequestExpired {
        request_id: Hash,
        requester: Address,
        refunded: Amount,
    },
    /// The manager provisioned an account proxy
    AccountCreated {
        gateway_id: GatewayId,
        gateway: Address,
        account: Address,
    },
    /// An account proxy was enabled or disabled
    ProxyAccountSet { account: Address, enabled: bool },
    /// An account proxy was bound to a gateway
    AccountGatewaySet { account: Address, gateway: Address },
    /// A gateway id was registered
    GatewaySet {
        gateway_id: GatewayId,
        gateway: Address,
    },
    /// The account beacon was configured
    AccountBeaconSet { beacon: Address },
    /// A prover was registered, replaced or migrated
    ProverSet {
        prover_id: ProverId,
        verifier: VerifierKind,
        migrated: bool,
    },
    /// The fee rate changed
    FeeRateSet { token_wei_per_byte: Amount },
    /// The payment token changed
    PaymentTokenSet { payment_token: Address },
    /// Collected fees were withdrawn
    FeeClaimed {
        gateway: Address,
        recipient: Address,
        amount: Amount,
    },
    /// A forward request was relayed
    Forwarded {
        from: Address,
        to: Address,
        nonce: u64,
        success: bool,
        gas_used: Gas,
    },
    /// The owner role moved
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl GatewayEvent {
    /// Short event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GatewayEvent::RequestBegin { .. } => "RequestBegin",
            GatewayEvent::RequestEnd { .. } => "RequestEnd",
            GatewayEvent::RequestExpired { .. } => "RequestExpired",
            GatewayEvent::AccountCreated { .. } => "AccountCreated",
            GatewayEvent::ProxyAccountSet { .. } => "ProxyAccountSet",
            GatewayEvent::AccountGatewaySet { .. } => "AccountGatewaySet",
            GatewayEvent::GatewaySet { .. } => "GatewaySet",
            GatewayEvent::AccountBeaconSet { .. } => "AccountBeaconSet",
            GatewayEvent::ProverSet { .. } => "ProverSet",
            GatewayEvent::FeeRateSet { .. } => "FeeRateSet",
            GatewayEvent::PaymentTokenSet { .. } => "PaymentTokenSet",
            GatewayEvent::FeeClaimed { .. } => "FeeClaimed",
            GatewayEvent::Forwarded { .. } => "Forwarded",
            GatewayEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// The request id carried by request lifecycle events.
    pub fn request_id(&self) -> Option<Hash> {
        match self {
            GatewayEvent::RequestBegin { request_id, .. }
            | GatewayEvent::RequestEnd { request_id, .. }
            | GatewayEvent::RequestExpired { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}
