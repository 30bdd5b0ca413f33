//! Delivery proof dispatch.
//!
//! Each prover names a [`VerifierKind`]:
//!
//! - `Mock` accepts every proof (development gateways).
//! - `Notary` expects an Ed25519 signature by the prover's verification key
//!   over `keccak256(request_hash || keccak256(response))`.
//! - `External(name)` hands the proof to a registered [`ResponseVerifier`].

use tlsgate_crypto::{notary_verify, Hash, NotaryPublicKey};
use tlsgate_store::ProverStore;
use tlsgate_types::{ProverEntry, ProverId, VerifierKind};
use tlsgate_valid::Validator;
use tlsgate_wire::attestation_digest;

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{Protocol, Runtime};
use crate::state::ProtocolState;

/// Check a delivery proof against a prover entry.
pub(crate) fn verify_entry<V: Validator>(
    runtime: &Runtime<V>,
    entry: &ProverEntry,
    request_hash: &Hash,
    response: &[u8],
    proof: &[u8],
) -> GatewayResult<bool> {
    let valid = match &entry.verifier {
        VerifierKind::Mock => true,
        VerifierKind::Notary => match NotaryPublicKey::from_slice(&entry.verification_key) {
            Ok(key) => {
                let digest = attestation_digest(request_hash, response);
                notary_verify(&key, &digest.0, proof)
            }
            Err(e) => {
                tracing::warn!(prover = %entry.prover_id, error = %e, "notary key unusable");
                false
            }
        },
        VerifierKind::External(name) => {
            let verifier = runtime
                .verifiers
                .get(name)
                .ok_or_else(|| GatewayError::UnknownVerifier(name.clone()))?;
            verifier.verify(request_hash, response, proof, &entry.verification_key)
        }
    };
    Ok(valid)
}

/// Look up a prover entry.
pub(crate) fn lookup_prover(
    state: &ProtocolState,
    prover_id: &ProverId,
) -> GatewayResult<ProverEntry> {
    state
        .provers
        .get_prover(prover_id)
        .ok_or(GatewayError::UnknownProver(*prover_id))
}

impl<V: Validator> Protocol<V> {
    /// Get a registered prover.
    ///
    /// # Errors
    /// - `UnknownProver` if the id is not registered
    pub fn get_prover(&self, prover_id: &ProverId) -> GatewayResult<ProverEntry> {
        lookup_prover(self.state(), prover_id)
    }

    /// All registered provers, ordered by id.
    pub fn list_provers(&self) -> Vec<ProverEntry> {
        self.state().provers.list_provers()
    }

    /// Verify a delivery proof with the prover's verifier.
    ///
    /// # Arguments
    /// * `prover_id` - Prover to verify with
    /// * `request_hash` - Hash the request was bound to
    /// * `response` - Response bytes
    /// * `proof` - Proof supplied by the gateway
    ///
    /// # Returns
    /// Whether the proof is valid.
    ///
    /// # Errors
    /// - `UnknownProver` if the id is not registered
    /// - `UnknownVerifier` if an external verifier name is not registered
    pub fn verify(
        &self,
        prover_id: &ProverId,
        request_hash: &Hash,
        response: &[u8],
        proof: &[u8],
    ) -> GatewayResult<bool> {
        let entry = lookup_prover(self.state(), prover_id)?;
        verify_entry(&self.runtime, &entry, request_hash, response, proof)
    }
}
