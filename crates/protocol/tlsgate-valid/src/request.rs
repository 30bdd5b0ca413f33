//! Submission validation.

use tlsgate_types::{
    SubmitRequest, MAX_ENCRYPTED_KEY_LENGTH, MAX_FORWARD_DATA_LENGTH, MAX_PROOF_LENGTH,
    MAX_REMOTE_LENGTH, MAX_RESPONSE_BYTES_LIMIT, MAX_SERVER_NAME_LENGTH, MAX_TEMPLATE_FIELDS,
};

use crate::error::{ValidationError, ValidationResult};

/// Input limits applied by a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLimits {
    /// Largest `max_response_bytes` a submission may ask for
    pub max_response_bytes_limit: u64,
    /// Maximum remote length
    pub max_remote_length: usize,
    /// Maximum server name length
    pub max_server_name_length: usize,
    /// Maximum number of template fields
    pub max_template_fields: usize,
    /// Maximum encrypted key length
    pub max_encrypted_key_length: usize,
    /// Maximum delivery proof length
    pub max_proof_length: usize,
    /// Maximum forwarded calldata length
    pub max_forward_data_length: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_response_bytes_limit: MAX_RESPONSE_BYTES_LIMIT,
            max_remote_length: MAX_REMOTE_LENGTH,
            max_server_name_length: MAX_SERVER_NAME_LENGTH,
            max_template_fields: MAX_TEMPLATE_FIELDS,
            max_encrypted_key_length: MAX_ENCRYPTED_KEY_LENGTH,
            max_proof_length: MAX_PROOF_LENGTH,
            max_forward_data_length: MAX_FORWARD_DATA_LENGTH,
        }
    }
}

/// Validate a submission against the gateway limits.
///
/// Checks, in order:
/// 1. `fields` and `values` have the same length, within the field limit
/// 2. remote and server name are non-empty and within their limits
/// 3. encrypted key is within its limit
/// 4. `0 < max_response_bytes <= max_response_bytes_limit`
/// 5. an explicit callback gas limit is non-zero
pub fn validate_submit(submit: &SubmitRequest, limits: &RequestLimits) -> ValidationResult<()> {
    let template = &submit.template;
    if template.fields.len() != template.values.len() {
        return Err(ValidationError::FieldValueMismatch {
            fields: template.fields.len(),
            values: template.values.len(),
        });
    }
    if template.fields.len() > limits.max_template_fields {
        return Err(ValidationError::TooManyFields {
            count: template.fields.len(),
            max: limits.max_template_fields,
        });
    }

    if submit.remote.is_empty() {
        return Err(ValidationError::EmptyRemote);
    }
    if submit.remote.len() > limits.max_remote_length {
        return Err(ValidationError::RemoteTooLong {
            len: submit.remote.len(),
            max: limits.max_remote_length,
        });
    }
    if submit.server_name.is_empty() {
        return Err(ValidationError::EmptyServerName);
    }
    if submit.server_name.len() > limits.max_server_name_length {
        return Err(ValidationError::ServerNameTooLong {
            len: submit.server_name.len(),
            max: limits.max_server_name_length,
        });
    }

    if submit.encrypted_key.len() > limits.max_encrypted_key_length {
        return Err(ValidationError::EncryptedKeyTooLong {
            len: submit.encrypted_key.len(),
            max: limits.max_encrypted_key_length,
        });
    }

    if submit.max_response_bytes == 0 {
        return Err(ValidationError::ZeroMaxResponseBytes);
    }
    if submit.max_response_bytes > limits.max_response_bytes_limit {
        return Err(ValidationError::MaxResponseBytesTooLarge {
            requested: submit.max_response_bytes,
            max: limits.max_response_bytes_limit,
        });
    }

    if submit.callback_gas_limit == Some(0) {
        return Err(ValidationError::ZeroCallbackGas);
    }

    Ok(())
}
