//! Data structures for the tlsgate protocol.
//!
//! This crate provides the data types shared by every tlsgate crate. It
//! contains no business logic, only type definitions with serialization
//! support.
//!
//! # Module Organization
//!
//! - [`request`] - Templated requests, submissions and request records
//! - [`prover`] - Prover registry entries and verifier kinds
//! - [`account`] - Authorized account proxies
//! - [`fee`] - Fee configuration
//! - [`forward`] - Meta-transaction forward requests
//! - [`event`] - Events emitted by protocol transitions
//! - [`constants`] - Protocol constants (limits, gas, economics)
//! - [`error`] - Stable error codes
//!
//! # Example
//!
//! ```
//! use tlsgate_types::{SubmitRequest, TemplatedRequest};
//! use tlsgate_crypto::keccak256;
//!
//! let template = TemplatedRequest::new(
//!     keccak256(b"request template"),
//!     keccak256(b"response template"),
//!     vec![1, 2],
//!     vec![b"alice".to_vec(), b"42".to_vec()],
//! );
//! let submit = SubmitRequest::new("https://httpbin.org", "httpbin.org", template, 0, 10_240);
//!
//! assert_eq!(submit.template.values.len(), 2);
//! assert!(submit.prover_id.is_none());
//! ```
//!
//! # Type Conventions
//!
//! - Derive `Debug`, `Clone`, `PartialEq`, `Eq` where appropriate
//! - Derive `Serialize`, `Deserialize` for event and state export
//! - Use `#[serde(rename_all = "snake_case")]` for consistent JSON
//! - Use `#[repr(u16)]` for enums with stable numeric values

/// Protocol version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod account;
pub mod constants;
pub mod error;
pub mod event;
pub mod fee;
pub mod forward;
pub mod prover;
pub mod request;

pub use account::{AuthorizedAccount, GatewayId};
pub use constants::*;
pub use error::ErrorCode;
pub use event::GatewayEvent;
pub use fee::FeeConfig;
pub use forward::{ForwardOutcome, ForwardRequest};
pub use prover::{ProverEntry, ProverId, VerifierKind};
pub use request::{
    RequestHashBinding, RequestRecord, RequestState, SubmitRequest, TemplatedRequest,
};

// Re-export the primitives most callers need alongside the data model.
pub use tlsgate_crypto::{Address, Hash, Timestamp, ZERO_ADDRESS, ZERO_HASH};

/// Token amount in base units (wei-like).
pub type Amount = u128;

/// Gas units.
pub type Gas = u64;
