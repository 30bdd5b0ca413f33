//! Cryptographic primitives for the tlsgate protocol.
//!
//! This crate provides all cryptographic functionality required by the gateway:
//!
//! - **Hashing**: Keccak-256, the hash every on-chain identifier is built from
//! - **Identity**: secp256k1 keypair generation and 20-byte address derivation
//! - **Signatures**: Ethereum personal-message signing and signer recovery
//! - **Notary attestations**: Ed25519 signatures used by notary provers
//!
//! # Example
//!
//! ```
//! use tlsgate_crypto::{
//!     address_from_public_key, generate_identity, keccak256, recover_signer, sign_digest,
//! };
//!
//! let (private_key, public_key) = generate_identity();
//! let address = address_from_public_key(&public_key);
//!
//! let digest = keccak256(b"forward me");
//! let signature = sign_digest(&private_key, &digest).unwrap();
//! assert_eq!(recover_signer(&digest, &signature).unwrap(), address);
//! ```

mod error;
mod hash;
mod identity;
mod notary;
mod serde_impl;
mod signature;

pub use error::CryptoError;
pub use hash::{keccak256, keccak256_concat, Keccak256Hasher};
pub use identity::{
    address_from_public_key, address_from_string, address_to_string, generate_identity,
    public_key_from_private,
};
pub use notary::{generate_notary_key, notary_sign, notary_verify, NotaryPublicKey};
pub use signature::{eth_signed_message_hash, recover_signer, sign_digest};

use ed25519_dalek::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte Keccak-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; 32]);

/// The all-zero hash, used where a hash slot is intentionally empty.
pub const ZERO_HASH: Hash = Hash([0u8; 32]);

impl Hash {
    /// Create a Hash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", hex_prefix(&self.0[..8]))
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 20-byte account address.
///
/// The address of a key is the last 20 bytes of `keccak256(uncompressed_public_key)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

/// The zero address.
pub const ZERO_ADDRESS: Address = Address([0u8; 20]);

impl Address {
    /// Create an Address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive an address from the last 20 bytes of a hash.
    pub fn from_hash_tail(hash: &Hash) -> Self {
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash.0[12..]);
        Self(out)
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        *self == ZERO_ADDRESS
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", address_to_string(self))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", address_to_string(self))
    }
}

impl std::str::FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        address_from_string(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A secp256k1 private key (32 bytes).
///
/// Implements Zeroize + ZeroizeOnDrop to clear key material from memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Create a PrivateKey from raw bytes.
    ///
    /// The bytes are validated lazily: signing with an out-of-range scalar
    /// fails at use time.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the private key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn to_secret_key(&self) -> Result<secp256k1::SecretKey, CryptoError> {
        secp256k1::SecretKey::from_slice(&self.0).map_err(|_| CryptoError::InvalidPrivateKey)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// A secp256k1 public key in uncompressed form without the `0x04` tag (64 bytes, `x || y`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 64]);

impl PublicKey {
    /// Create a PublicKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex_prefix(&self.0[..8]))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A recoverable ECDSA signature in `v || r || s` layout (65 bytes).
///
/// `v` is 27 or 28.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 65]);

impl Signature {
    /// Create a Signature from raw bytes.
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Parse a signature from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 65] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Get the raw bytes of the signature.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The recovery byte.
    pub fn v(&self) -> u8 {
        self.0[0]
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", hex_prefix(&self.0[..8]))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An Ed25519 notary signing key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NotaryKey([u8; 32]);

impl NotaryKey {
    /// Create a NotaryKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub(crate) fn from_signing_key(key: &SigningKey) -> Self {
        Self(key.to_bytes())
    }

    pub(crate) fn to_signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

impl std::fmt::Debug for NotaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotaryKey([REDACTED])")
    }
}

/// Milliseconds since Unix epoch.
pub type Timestamp = u64;

fn hex_prefix(bytes: &[u8]) -> String {
    format!("0x{}...", hex::encode(bytes))
}
