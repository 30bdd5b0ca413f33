//! Ed25519 notary attestations.
//!
//! A notary prover attests to a delivered response by signing a 32-byte
//! attestation digest with its Ed25519 key. The verifier side only sees the
//! 32-byte public key stored in the prover registry.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::CryptoError;
use crate::NotaryKey;

/// An Ed25519 notary public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotaryPublicKey(pub [u8; 32]);

impl NotaryPublicKey {
    /// Parse a notary key from registry key material.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidNotaryKey(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Get the raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for NotaryPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotaryPublicKey(0x{}...)", hex::encode(&self.0[..8]))
    }
}

/// Generate a new notary keypair.
pub fn generate_notary_key() -> (NotaryKey, NotaryPublicKey) {
    let mut csprng = OsRng;
    let signing_key = SigningKey::generate(&mut csprng);
    let public = NotaryPublicKey(signing_key.verifying_key().to_bytes());
    (NotaryKey::from_signing_key(&signing_key), public)
}

/// Sign an attestation message.
pub fn notary_sign(key: &NotaryKey, message: &[u8]) -> [u8; 64] {
    key.to_signing_key().sign(message).to_bytes()
}

/// Verify a notary attestation.
///
/// Returns `false` for malformed keys or signatures rather than an error;
/// a bad attestation is simply not a valid one.
pub fn notary_verify(public_key: &NotaryPublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    let signature = Ed25519Signature::from_bytes(&sig_bytes);
    verifying_key.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let (key, public) = generate_notary_key();
        let sig = notary_sign(&key, b"attestation");
        assert!(notary_verify(&public, b"attestation", &sig));
    }

    #[test]
    fn test_verify_wrong_message() {
        let (key, public) = generate_notary_key();
        let sig = notary_sign(&key, b"attestation");
        assert!(!notary_verify(&public, b"tampered", &sig));
    }

    #[test]
    fn test_verify_wrong_key() {
        let (key, _) = generate_notary_key();
        let (_, other) = generate_notary_key();
        let sig = notary_sign(&key, b"attestation");
        assert!(!notary_verify(&other, b"attestation", &sig));
    }

    #[test]
    fn test_verify_short_signature() {
        let (_, public) = generate_notary_key();
        assert!(!notary_verify(&public, b"attestation", &[0u8; 10]));
    }

    #[test]
    fn test_public_key_from_slice() {
        let (_, public) = generate_notary_key();
        assert_eq!(NotaryPublicKey::from_slice(&public.0).unwrap(), public);
        assert_eq!(
            NotaryPublicKey::from_slice(&[1, 2, 3]),
            Err(CryptoError::InvalidNotaryKey(3))
        );
    }
}
