//! Prover registry types.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::{keccak256, Hash};

/// Opaque 32-byte prover identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProverId(pub Hash);

impl ProverId {
    /// Derive a prover id from a human-readable label.
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()))
    }
}

impl std::fmt::Debug for ProverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProverId({})", self.0)
    }
}

impl std::fmt::Display for ProverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The verification routine a prover is checked with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum VerifierKind {
    /// Accepts every proof
    Mock,
    /// Ed25519 attestation by the registered notary key
    Notary,
    /// A named verifier registered with the protocol (e.g. a zk verifier)
    External(String),
}

impl std::fmt::Display for VerifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifierKind::Mock => write!(f, "mock"),
            VerifierKind::Notary => write!(f, "notary"),
            VerifierKind::External(name) => write!(f, "external:{}", name),
        }
    }
}

/// A registered prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProverEntry {
    /// Prover identifier
    pub prover_id: ProverId,
    /// Verification routine
    pub verifier: VerifierKind,
    /// Key material handed to the verifier
    pub verification_key: Vec<u8>,
    /// Number of submitted requests that still reference this prover
    pub in_flight: u64,
}

impl ProverEntry {
    /// Create a prover entry with no in-flight requests.
    pub fn new(prover_id: ProverId, verifier: VerifierKind, verification_key: Vec<u8>) -> Self {
        Self {
            prover_id,
            verifier,
            verification_key,
            in_flight: 0,
        }
    }

    /// Whether pending requests still reference this prover.
    pub fn is_in_use(&self) -> bool {
        self.in_flight > 0
    }
}
