//! Delivery validation.

use crate::error::{ValidationError, ValidationResult};

/// Check a response against the request's `max_response_bytes`.
pub fn validate_response(response: &[u8], max_response_bytes: u64) -> ValidationResult<()> {
    let len = response.len() as u64;
    if len > max_response_bytes {
        return Err(ValidationError::ResponseTooLarge {
            len,
            max: max_response_bytes,
        });
    }
    Ok(())
}

/// Check a proof's length.
pub fn validate_proof(proof: &[u8], max_proof_length: usize) -> ValidationResult<()> {
    if proof.len() > max_proof_length {
        return Err(ValidationError::ProofTooLarge {
            len: proof.len(),
            max: max_proof_length,
        });
    }
    Ok(())
}
