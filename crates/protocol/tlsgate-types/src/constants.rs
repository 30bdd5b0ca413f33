//! Protocol constants.
//!
//! These define the default economics, input limits and callback gas model
//! used when a `ProtocolConfig` does not override them.

use crate::{Amount, Gas};

// =============================================================================
// Economics
// =============================================================================

/// One gwei in token base units.
pub const GWEI: Amount = 1_000_000_000;

/// Default fee rate: 1 gwei per request/response byte
pub const DEFAULT_TOKEN_WEI_PER_BYTE: Amount = GWEI;

// =============================================================================
// Request Limits
// =============================================================================

/// Upper bound on `max_response_bytes` a submission may ask for: 1 MiB
pub const MAX_RESPONSE_BYTES_LIMIT: u64 = 1_048_576;

/// Maximum remote endpoint length (characters)
pub const MAX_REMOTE_LENGTH: usize = 2048;

/// Maximum TLS server name length (DNS name limit)
pub const MAX_SERVER_NAME_LENGTH: usize = 253;

/// Maximum number of template fields per request
pub const MAX_TEMPLATE_FIELDS: usize = 256;

/// Maximum encrypted key length (bytes)
pub const MAX_ENCRYPTED_KEY_LENGTH: usize = 1024;

/// Maximum proof length accepted on delivery: 256 KiB
pub const MAX_PROOF_LENGTH: usize = 262_144;

// =============================================================================
// Callback Gas
// =============================================================================

/// Fixed gas charged for entering a response callback
pub const CALLBACK_GAS_BASE: Gas = 50_000;

/// Gas charged per response byte handed to a callback
pub const CALLBACK_GAS_PER_BYTE: Gas = 16;

/// Callback gas stipend used when a submission does not set one
pub const DEFAULT_CALLBACK_GAS_LIMIT: Gas = 2_000_000;

// =============================================================================
// Forwarder
// =============================================================================

/// Maximum calldata length of a forwarded call: 128 KiB
pub const MAX_FORWARD_DATA_LENGTH: usize = 131_072;

/// Gas charged per calldata byte of a forwarded call
pub const FORWARD_GAS_PER_BYTE: Gas = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_is_one_gwei() {
        assert_eq!(DEFAULT_TOKEN_WEI_PER_BYTE, 1_000_000_000);
    }

    #[test]
    fn test_default_stipend_covers_typical_response() {
        // 60 KiB response through the default stipend
        let gas = CALLBACK_GAS_BASE + CALLBACK_GAS_PER_BYTE * 61_440;
        assert!(gas < DEFAULT_CALLBACK_GAS_LIMIT);
    }
}
