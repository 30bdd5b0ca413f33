//! Input validation rules for the tlsgate protocol.
//!
//! Validation here is stateless: it checks shapes and limits of submissions,
//! deliveries and forward requests. Everything that needs protocol state
//! (authorization, fees, nonces, hashes) is checked by `tlsgate-ops`.
//!
//! # Usage
//!
//! ```
//! use tlsgate_valid::{DefaultValidator, Validator};
//! use tlsgate_types::{SubmitRequest, TemplatedRequest};
//! use tlsgate_crypto::keccak256;
//!
//! let template = TemplatedRequest::new(
//!     keccak256(b"req"),
//!     keccak256(b"resp"),
//!     vec![1],
//!     vec![b"value".to_vec()],
//! );
//! let submit = SubmitRequest::new("https://httpbin.org", "httpbin.org", template, 0, 10_240);
//!
//! let validator = DefaultValidator::new();
//! assert!(validator.validate_submit(&submit).is_ok());
//! assert!(validator.validate_response(&[0u8; 20_000], 10_240).is_err());
//! ```

mod delivery;
mod error;
mod forward;
mod request;

pub use delivery::{validate_proof, validate_response};
pub use error::{ValidationError, ValidationResult};
pub use forward::validate_forward_request;
pub use request::{validate_submit, RequestLimits};

use tlsgate_types::{ForwardRequest, SubmitRequest};

/// Combined validation entry point.
pub trait Validator {
    /// Validate a submission.
    fn validate_submit(&self, submit: &SubmitRequest) -> ValidationResult<()>;

    /// Validate a delivered response against the request's limit.
    fn validate_response(&self, response: &[u8], max_response_bytes: u64)
        -> ValidationResult<()>;

    /// Validate a delivery proof.
    fn validate_proof(&self, proof: &[u8]) -> ValidationResult<()>;

    /// Validate a forward request.
    fn validate_forward(&self, request: &ForwardRequest) -> ValidationResult<()>;
}

/// Validator backed by a set of [`RequestLimits`].
#[derive(Debug, Clone, Default)]
pub struct DefaultValidator {
    limits: RequestLimits,
}

impl DefaultValidator {
    /// Create a validator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom limits.
    pub fn with_limits(limits: RequestLimits) -> Self {
        Self { limits }
    }

    /// The limits in use.
    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }
}

impl Validator for DefaultValidator {
    fn validate_submit(&self, submit: &SubmitRequest) -> ValidationResult<()> {
        validate_submit(submit, &self.limits)
    }

    fn validate_response(
        &self,
        response: &[u8],
        max_response_bytes: u64,
    ) -> ValidationResult<()> {
        validate_response(response, max_response_bytes)
    }

    fn validate_proof(&self, proof: &[u8]) -> ValidationResult<()> {
        validate_proof(proof, self.limits.max_proof_length)
    }

    fn validate_forward(&self, request: &ForwardRequest) -> ValidationResult<()> {
        validate_forward_request(request, self.limits.max_forward_data_length)
    }
}
