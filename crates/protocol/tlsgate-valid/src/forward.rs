//! Forward request validation.
//!
//! Signature and nonce checks need forwarder state and live in the
//! forwarder itself; this only rejects malformed requests.

use tlsgate_types::ForwardRequest;

use crate::error::{ValidationError, ValidationResult};

/// Validate the shape of a forward request.
pub fn validate_forward_request(
    request: &ForwardRequest,
    max_data_length: usize,
) -> ValidationResult<()> {
    if request.to.is_zero() {
        return Err(ValidationError::ZeroForwardTarget);
    }
    if request.data.len() > max_data_length {
        return Err(ValidationError::ForwardDataTooLarge {
            len: request.data.len(),
            max: max_data_length,
        });
    }
    Ok(())
}
