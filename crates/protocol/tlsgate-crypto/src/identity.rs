//! Account identity.
//!
//! Accounts are secp256k1 keypairs. The account address is derived from the
//! uncompressed public key:
//! ```text
//! Address = keccak256(x || y)[12:32]
//! ```
//!
//! Human-readable format: `0x` + 40 lowercase hex characters.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::Secp256k1;

use crate::error::CryptoError;
use crate::hash::keccak256;
use crate::{Address, PrivateKey, PublicKey};

/// Generate a new secp256k1 identity (keypair).
///
/// Draws 32 bytes from the operating system's RNG until they form a valid
/// scalar.
///
/// # Example
/// ```
/// use tlsgate_crypto::generate_identity;
///
/// let (private_key, public_key) = generate_identity();
/// ```
pub fn generate_identity() -> (PrivateKey, PublicKey) {
    let secp = Secp256k1::signing_only();
    let mut csprng = OsRng;
    loop {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        if let Ok(secret) = secp256k1::SecretKey::from_slice(&bytes) {
            let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
            return (PrivateKey::from_bytes(bytes), encode_public_key(&public));
        }
    }
}

/// Derive the public key for a private key.
pub fn public_key_from_private(private_key: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let secp = Secp256k1::signing_only();
    let secret = private_key.to_secret_key()?;
    let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
    Ok(encode_public_key(&public))
}

/// Derive an Address from a public key.
///
/// # Example
/// ```
/// use tlsgate_crypto::{address_from_public_key, generate_identity};
///
/// let (_, public_key) = generate_identity();
/// let address = address_from_public_key(&public_key);
/// assert_eq!(address.0.len(), 20);
/// ```
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    Address::from_hash_tail(&keccak256(&public_key.0))
}

/// Convert an Address to its `0x`-prefixed lowercase hex form.
pub fn address_to_string(address: &Address) -> String {
    format!("0x{}", hex::encode(address.0))
}

/// Parse a `0x`-prefixed hex address. Mixed case is accepted.
///
/// # Errors
/// - `InvalidAddressFormat` if the prefix is missing or the length is wrong
/// - `InvalidHex` if the body is not hex
pub fn address_from_string(s: &str) -> Result<Address, CryptoError> {
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| CryptoError::InvalidAddressFormat(s.to_string()))?;

    if body.len() != 40 {
        return Err(CryptoError::InvalidAddressFormat(s.to_string()));
    }

    let bytes = hex::decode(body).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(Address(out))
}

pub(crate) fn encode_public_key(public: &secp256k1::PublicKey) -> PublicKey {
    let uncompressed = public.serialize_uncompressed();
    let mut out = [0u8; 64];
    // Drop the 0x04 tag.
    out.copy_from_slice(&uncompressed[1..]);
    PublicKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identity_unique() {
        let (_, pk1) = generate_identity();
        let (_, pk2) = generate_identity();
        assert_ne!(pk1, pk2);
    }

    #[test]
    fn test_public_key_from_private_matches() {
        let (private_key, public_key) = generate_identity();
        assert_eq!(public_key_from_private(&private_key).unwrap(), public_key);
    }

    #[test]
    fn test_known_address() {
        // Private key 1 maps to the generator point.
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let public_key = public_key_from_private(&PrivateKey::from_bytes(bytes)).unwrap();
        let address = address_from_public_key(&public_key);
        assert_eq!(
            address.to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let zero = PrivateKey::from_bytes([0u8; 32]);
        assert_eq!(
            public_key_from_private(&zero),
            Err(CryptoError::InvalidPrivateKey)
        );
    }

    #[test]
    fn test_address_string_roundtrip() {
        let (_, public_key) = generate_identity();
        let address = address_from_public_key(&public_key);
        let parsed = address_from_string(&address_to_string(&address)).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_address_from_string_mixed_case() {
        let parsed = address_from_string("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap();
        assert_eq!(
            parsed.to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_address_from_string_errors() {
        assert!(matches!(
            address_from_string("7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            Err(CryptoError::InvalidAddressFormat(_))
        ));
        assert!(matches!(
            address_from_string("0x1234"),
            Err(CryptoError::InvalidAddressFormat(_))
        ));
        assert!(matches!(
            address_from_string("0xzz5f4552091a69125d5dfcb7b8c2659029395bdf"),
            Err(CryptoError::InvalidHex(_))
        ));
    }
}
