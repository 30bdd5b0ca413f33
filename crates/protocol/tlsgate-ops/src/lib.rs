//! Protocol operations for the tlsgate request gateway.
//!
//! This crate provides the orchestration layer that combines the foundation
//! crates (store, valid, econ, wire, types, crypto) into the gateway's state
//! transitions.
//!
//! # Module Organization
//!
//! - [`error`] - Operation error types
//! - [`config`] - Protocol configuration and TOML loading
//! - [`handlers`] - Capability traits (response handlers, verifiers, call targets)
//! - [`state`] - Protocol state and the owner capability
//! - [`protocol`] - The `Protocol` struct and its transaction wrapper
//! - [`identifier`] - Request id and request hash derivation
//! - [`verifier`] - Delivery proof dispatch
//! - [`gateway`] - Submit, deliver and expire
//! - [`accounts`] - Account manager operations
//! - [`admin`] - Owner operations (provers, fees, ownership)
//! - [`forwarder`] - Meta-transaction forwarder
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tlsgate_crypto::{keccak256, Address, Hash};
//! use tlsgate_econ::GasMeter;
//! use tlsgate_ops::{CallbackError, Protocol, ProtocolConfig, ResponseHandler};
//! use tlsgate_store::TokenLedger;
//! use tlsgate_types::{SubmitRequest, TemplatedRequest};
//!
//! struct Accept;
//!
//! impl ResponseHandler for Accept {
//!     fn handle_response(
//!         &self,
//!         _gas: &mut GasMeter,
//!         _request_id: &Hash,
//!         _request_hash: &Hash,
//!         _response: &[u8],
//!     ) -> Result<(), CallbackError> {
//!         Ok(())
//!     }
//! }
//!
//! let owner = Address([1; 20]);
//! let gateway = Address([2; 20]);
//! let token = Address([3; 20]);
//!
//! let config = ProtocolConfig::default()
//!     .with_payment_token(token)
//!     .with_token_wei_per_byte(1);
//! let mut protocol = Protocol::new(owner, Address([4; 20]), config);
//! let cap = protocol.owner_cap(&owner).unwrap();
//!
//! protocol.set_gateway(&cap, 1, gateway).unwrap();
//! protocol.set_account_beacon(&cap, Address([5; 20])).unwrap();
//! let account = protocol.create_account(&cap, 1, Arc::new(Accept)).unwrap();
//! protocol.ledger_mut().mint(&token, &account, 1_000).unwrap();
//!
//! let template = TemplatedRequest::new(
//!     keccak256(b"request template"),
//!     keccak256(b"response template"),
//!     vec![1],
//!     vec![b"42".to_vec()],
//! );
//! let submit = SubmitRequest::new("https://httpbin.org", "httpbin.org", template, 102, 100);
//! let receipt = protocol.submit(account, gateway, submit).unwrap();
//!
//! protocol
//!     .deliver(gateway, receipt.request_id, receipt.request_hash, b"{}", b"")
//!     .unwrap();
//! assert_eq!(protocol.pending_requests(), 0);
//! ```
//!
//! # Transactions
//!
//! Every state-changing operation runs inside a transaction on the
//! [`ProtocolState`]. The stores journal the entries a transition touches
//! and undo them if it fails, so a failed submit, delivery, expiry or
//! forward leaves balances, nonces, records and the event log exactly as
//! they were.

pub mod accounts;
pub mod admin;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod gateway;
pub mod handlers;
pub mod identifier;
pub mod protocol;
pub mod state;
pub mod verifier;

pub use config::{ConfigError, FeeSection, ForwarderSection, GatewaySection, ProtocolConfig};
pub use error::{GatewayError, GatewayResult};
pub use forwarder::forward_signer;
pub use gateway::{DeliveryReceipt, SubmitReceipt};
pub use handlers::{
    CallContext, CallError, CallTarget, CallbackError, ResponseHandler, ResponseVerifier,
};
pub use identifier::{
    bind_request_hash, compute_request_hash, compute_request_hash_compact, compute_request_id,
};
pub use protocol::{current_timestamp, DefaultProtocol, Protocol};
pub use state::{OwnerCap, ProtocolState};
