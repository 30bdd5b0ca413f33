//! Solidity ABI identifiers and digests for tlsgate.
//!
//! Request ids, request hashes and forward request digests must be
//! byte-for-byte reproducible by off-chain tooling, so they are defined over
//! the contract ABI (encoded with `alloy-sol-types`) rather than over a
//! Rust-specific serialization.
//!
//! - [`abi`] - conversions to and from alloy ABI types
//! - [`digest`] - the protocol's identifier and digest functions

pub mod abi;
pub mod digest;

pub use abi::{from_sol_address, from_sol_hash, sol_address, sol_bytes, sol_hash};
pub use digest::{
    account_address, attestation_digest, compact_request_hash, forward_request_digest,
    request_id, template_request_hash,
};
