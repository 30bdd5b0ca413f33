//! Stable error codes for the tlsgate protocol.
//!
//! Every failed transition surfaces one of these codes, so off-chain
//! infrastructure can branch on the numeric value rather than on messages.

use serde::{Deserialize, Serialize};

/// Protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Fee Errors (0x0100 - 0x01FF)
    // =========================================================================
    /// Offered fee is below the estimate
    InsufficientFee = 0x0100,
    /// Token balance or allowance does not cover a transfer
    InsufficientBalance = 0x0101,
    /// Checked arithmetic overflowed
    Overflow = 0x0102,

    // =========================================================================
    // Request Errors (0x0200 - 0x02FF)
    // =========================================================================
    /// No request exists for the given id
    UnknownRequest = 0x0200,
    /// Supplied request hash differs from the bound hash
    HashMismatch = 0x0201,
    /// Prover rejected the delivery proof
    InvalidProof = 0x0202,
    /// Response exceeds the request's max response bytes
    ResponseTooLarge = 0x0203,
    /// Request was already delivered
    AlreadyDelivered = 0x0204,
    /// Request passed its deadline or was expired
    RequestExpired = 0x0205,
    /// Submission failed input validation
    InvalidRequest = 0x0206,
    /// Account callback reverted
    CallbackFailed = 0x0207,
    /// Callback or forwarded call ran out of gas
    OutOfGas = 0x0208,
    /// Request expiry is not configured
    ExpiryDisabled = 0x0209,

    // =========================================================================
    // Registry Errors (0x0300 - 0x03FF)
    // =========================================================================
    /// Prover id is not registered
    UnknownProver = 0x0300,
    /// Prover has in-flight requests and cannot be overwritten
    ProverInUse = 0x0301,
    /// Gateway is not registered with the manager
    UnknownGateway = 0x0302,
    /// Caller is not authorized (account gate or owner role)
    Unauthorized = 0x0303,
    /// No account beacon configured
    BeaconNotSet = 0x0304,
    /// External verifier name is not registered
    UnknownVerifier = 0x0305,

    // =========================================================================
    // Forwarder Errors (0x0400 - 0x04FF)
    // =========================================================================
    /// Forward request nonce is not the expected next nonce
    InvalidNonce = 0x0400,
    /// Recovered signer does not match `from`
    InvalidSignature = 0x0401,
    /// Forward target is not a known call target
    UnknownTarget = 0x0402,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error
    InternalError = 0xFFFF,
}

impl ErrorCode {
    /// Returns true if this is a fee error (0x0100-0x01FF)
    pub fn is_fee_error(&self) -> bool {
        (0x0100..=0x01FF).contains(&self.code())
    }

    /// Returns true if this is a request error (0x0200-0x02FF)
    pub fn is_request_error(&self) -> bool {
        (0x0200..=0x02FF).contains(&self.code())
    }

    /// Returns true if this is a registry error (0x0300-0x03FF)
    pub fn is_registry_error(&self) -> bool {
        (0x0300..=0x03FF).contains(&self.code())
    }

    /// Returns true if this is a forwarder error (0x0400-0x04FF)
    pub fn is_forwarder_error(&self) -> bool {
        (0x0400..=0x04FF).contains(&self.code())
    }

    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get a recovery hint for off-chain callers.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InsufficientFee => Some("Re-run fee estimation with the current rate and resubmit."),
            Self::InsufficientBalance => Some("Fund the account with payment tokens or raise the allowance."),
            Self::Overflow => Some("Byte counts or fee rate are out of range."),
            Self::UnknownRequest => Some("Check the request id against the RequestBegin event."),
            Self::HashMismatch => Some("Deliver with the request hash emitted at submission."),
            Self::InvalidProof => Some("The proof does not verify against the prover's key."),
            Self::ResponseTooLarge => Some("Truncate the response or submit with a larger max_response_bytes."),
            Self::AlreadyDelivered => None,
            Self::RequestExpired => Some("Resubmit the request; the fee was refunded on expiry."),
            Self::InvalidRequest => Some("Check remote, server name, fields/values and response limits."),
            Self::CallbackFailed => Some("The account's response handler rejected the delivery."),
            Self::OutOfGas => Some("Submit with a larger callback gas limit."),
            Self::ExpiryDisabled => Some("Set request_ttl_ms in the gateway configuration."),
            Self::UnknownProver => Some("Register the prover with set_prover first."),
            Self::ProverInUse => Some("Use migrate_prover to replace a prover with pending requests."),
            Self::UnknownGateway => Some("Register the gateway with set_gateway first."),
            Self::Unauthorized => Some("The account is disabled, bound to another gateway, or not the owner."),
            Self::BeaconNotSet => Some("Configure the account beacon with set_account_beacon."),
            Self::UnknownVerifier => Some("Register the external verifier before referencing it."),
            Self::InvalidNonce => Some("Fetch the sender's current nonce and re-sign."),
            Self::InvalidSignature => Some("Sign the forward request digest with the `from` key."),
            Self::UnknownTarget => Some("Register the call target with the forwarder."),
            Self::InternalError => Some("An internal error occurred. Please report this issue."),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        if self.is_fee_error() {
            "Fee"
        } else if self.is_request_error() {
            "Request"
        } else if self.is_registry_error() {
            "Registry"
        } else if self.is_forwarder_error() {
            "Forwarder"
        } else {
            "Internal"
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::InsufficientFee => "INSUFFICIENT_FEE",
            ErrorCode::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ErrorCode::Overflow => "OVERFLOW",
            ErrorCode::UnknownRequest => "UNKNOWN_REQUEST",
            ErrorCode::HashMismatch => "HASH_MISMATCH",
            ErrorCode::InvalidProof => "INVALID_PROOF",
            ErrorCode::ResponseTooLarge => "RESPONSE_TOO_LARGE",
            ErrorCode::AlreadyDelivered => "ALREADY_DELIVERED",
            ErrorCode::RequestExpired => "REQUEST_EXPIRED",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::CallbackFailed => "CALLBACK_FAILED",
            ErrorCode::OutOfGas => "OUT_OF_GAS",
            ErrorCode::ExpiryDisabled => "EXPIRY_DISABLED",
            ErrorCode::UnknownProver => "UNKNOWN_PROVER",
            ErrorCode::ProverInUse => "PROVER_IN_USE",
            ErrorCode::UnknownGateway => "UNKNOWN_GATEWAY",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::BeaconNotSet => "BEACON_NOT_SET",
            ErrorCode::UnknownVerifier => "UNKNOWN_VERIFIER",
            ErrorCode::InvalidNonce => "INVALID_NONCE",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::UnknownTarget => "UNKNOWN_TARGET",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::InsufficientFee as u16, 0x0100);
        assert_eq!(ErrorCode::InsufficientBalance as u16, 0x0101);
        assert_eq!(ErrorCode::Overflow as u16, 0x0102);

        assert_eq!(ErrorCode::UnknownRequest as u16, 0x0200);
        assert_eq!(ErrorCode::HashMismatch as u16, 0x0201);
        assert_eq!(ErrorCode::InvalidProof as u16, 0x0202);
        assert_eq!(ErrorCode::ResponseTooLarge as u16, 0x0203);
        assert_eq!(ErrorCode::AlreadyDelivered as u16, 0x0204);

        assert_eq!(ErrorCode::UnknownProver as u16, 0x0300);
        assert_eq!(ErrorCode::Unauthorized as u16, 0x0303);

        assert_eq!(ErrorCode::InvalidNonce as u16, 0x0400);
        assert_eq!(ErrorCode::InvalidSignature as u16, 0x0401);

        assert_eq!(ErrorCode::InternalError as u16, 0xFFFF);
    }

    #[test]
    fn test_error_code_categories() {
        assert!(ErrorCode::InsufficientFee.is_fee_error());
        assert!(ErrorCode::Overflow.is_fee_error());
        assert!(!ErrorCode::Overflow.is_request_error());

        assert!(ErrorCode::HashMismatch.is_request_error());
        assert!(ErrorCode::OutOfGas.is_request_error());

        assert!(ErrorCode::ProverInUse.is_registry_error());
        assert!(ErrorCode::Unauthorized.is_registry_error());

        assert!(ErrorCode::InvalidNonce.is_forwarder_error());
        assert!(!ErrorCode::InvalidNonce.is_registry_error());

        assert_eq!(ErrorCode::InternalError.category(), "Internal");
        assert_eq!(ErrorCode::InvalidSignature.category(), "Forwarder");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::HashMismatch.to_string(), "HASH_MISMATCH");
        assert_eq!(ErrorCode::ResponseTooLarge.to_string(), "RESPONSE_TOO_LARGE");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InvalidNonce).unwrap();
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::InvalidNonce);
    }
}
