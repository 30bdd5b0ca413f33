//! Error types for tlsgate-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Address string is not `0x` followed by 40 hex characters
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    /// Invalid hex encoding
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Private key bytes are not a valid secp256k1 scalar
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature has the wrong number of bytes
    #[error("Invalid signature length: expected 65, got {0}")]
    InvalidSignatureLength(usize),

    /// Recovery byte is not 27/28 (or 0/1)
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// Signer could not be recovered from the signature
    #[error("Signature recovery failed")]
    RecoveryFailed,

    /// Notary key material has the wrong number of bytes
    #[error("Invalid notary key length: expected 32, got {0}")]
    InvalidNotaryKey(usize),
}
