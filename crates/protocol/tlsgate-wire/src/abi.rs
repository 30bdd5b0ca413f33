//! Conversions between tlsgate primitives and alloy ABI types.
//!
//! Encoding itself is done by `alloy_sol_types::SolValue`; this module only
//! moves values across the type boundary.

use alloy_primitives::{Address as SolAddress, Bytes, B256};
use tlsgate_crypto::{Address, Hash};

/// An address as an ABI `address`.
pub fn sol_address(address: &Address) -> SolAddress {
    SolAddress::from(address.0)
}

/// A hash as an ABI `bytes32`.
pub fn sol_hash(hash: &Hash) -> B256 {
    B256::from(hash.0)
}

/// Raw bytes as an ABI `bytes`.
pub fn sol_bytes(data: &[u8]) -> Bytes {
    Bytes::copy_from_slice(data)
}

/// An ABI `address` back as an address.
pub fn from_sol_address(address: SolAddress) -> Address {
    Address(address.into_array())
}

/// An ABI `bytes32` back as a hash.
pub fn from_sol_hash(hash: B256) -> Hash {
    Hash(hash.0)
}
