//! Keccak-256 hashing.
//!
//! Every identifier in the protocol (request ids, request hashes, forward
//! request digests, addresses) is a Keccak-256 digest, so this is the only
//! hash function the gateway uses on-path.

use sha3::{Digest, Keccak256};

use crate::Hash;

/// Compute the Keccak-256 hash of the given bytes.
///
/// # Example
/// ```
/// use tlsgate_crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hash.to_string(),
///     "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result: [u8; 32] = hasher.finalize().into();
    Hash(result)
}

/// Hash the concatenation of several byte slices without allocating.
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Incremental Keccak-256 hasher.
#[derive(Clone, Default)]
pub struct Keccak256Hasher {
    inner: Keccak256,
}

impl Keccak256Hasher {
    /// Create a fresh hasher.
    pub fn new() -> Self {
        Self {
            inner: Keccak256::new(),
        }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Consume the hasher and produce the digest.
    pub fn finalize(self) -> Hash {
        let result: [u8; 32] = self.inner.finalize().into();
        Hash(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vector() {
        // keccak256("hello")
        assert_eq!(
            keccak256(b"hello").to_string(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak_deterministic() {
        assert_eq!(keccak256(b"test"), keccak256(b"test"));
        assert_ne!(keccak256(b"test1"), keccak256(b"test2"));
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        let joined = keccak256(b"gatewayaccount");
        let parts = keccak256_concat(&[b"gateway", b"account"]);
        assert_eq!(joined, parts);
    }

    proptest::proptest! {
        #[test]
        fn prop_streaming_matches_one_shot(
            data in proptest::collection::vec(proptest::num::u8::ANY, 0..512),
            split in 0usize..512,
        ) {
            let split = split.min(data.len());
            let mut hasher = Keccak256Hasher::new();
            hasher.update(&data[..split]);
            hasher.update(&data[split..]);
            proptest::prop_assert_eq!(hasher.finalize(), keccak256(&data));
        }
    }
}
