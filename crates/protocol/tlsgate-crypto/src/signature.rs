//! Recoverable ECDSA signatures (Ethereum personal-message scheme).
//!
//! A 32-byte digest is never signed directly. It is first wrapped:
//! ```text
//! signed = keccak256("\x19Ethereum Signed Message:\n32" || digest)
//! ```
//! and the signature is laid out as `v || r || s` with `v` in {27, 28}.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};

use crate::error::CryptoError;
use crate::hash::keccak256_concat;
use crate::identity::encode_public_key;
use crate::{address_from_public_key, Address, Hash, PrivateKey, Signature};

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Offset added to the raw recovery id when encoding `v`.
const V_OFFSET: u8 = 27;

/// Wrap a digest with the personal-message prefix.
///
/// # Example
/// ```
/// use tlsgate_crypto::{eth_signed_message_hash, keccak256};
///
/// let digest = keccak256(b"payload");
/// assert_ne!(eth_signed_message_hash(&digest), digest);
/// ```
pub fn eth_signed_message_hash(digest: &Hash) -> Hash {
    keccak256_concat(&[PERSONAL_MESSAGE_PREFIX, &digest.0])
}

/// Sign a digest as a personal message.
///
/// # Errors
/// - `InvalidPrivateKey` if the key bytes are not a valid scalar
pub fn sign_digest(private_key: &PrivateKey, digest: &Hash) -> Result<Signature, CryptoError> {
    let secp = Secp256k1::signing_only();
    let secret = private_key.to_secret_key()?;
    let message = Message::from_digest(eth_signed_message_hash(digest).0);

    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, &secret)
        .serialize_compact();

    let mut out = [0u8; 65];
    out[0] = recovery_id.to_i32() as u8 + V_OFFSET;
    out[1..].copy_from_slice(&compact);
    Ok(Signature(out))
}

/// Recover the address that signed `digest` as a personal message.
///
/// `v` may be given either as 27/28 or as the raw 0/1 recovery id.
///
/// # Errors
/// - `InvalidRecoveryId` if `v` is out of range
/// - `RecoveryFailed` if `r || s` is malformed or no key recovers
pub fn recover_signer(digest: &Hash, signature: &Signature) -> Result<Address, CryptoError> {
    let v = signature.v();
    let raw = match v {
        0 | 1 => v,
        27 | 28 => v - V_OFFSET,
        other => return Err(CryptoError::InvalidRecoveryId(other)),
    };

    let recovery_id =
        RecoveryId::from_i32(raw as i32).map_err(|_| CryptoError::InvalidRecoveryId(v))?;
    let recoverable = RecoverableSignature::from_compact(&signature.0[1..], recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(eth_signed_message_hash(digest).0);
    let public = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_public_key(&encode_public_key(&public)))
}
