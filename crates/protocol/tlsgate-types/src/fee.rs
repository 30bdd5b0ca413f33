//! Fee configuration.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::{Address, ZERO_ADDRESS};

use crate::constants::DEFAULT_TOKEN_WEI_PER_BYTE;
use crate::Amount;

/// Owner-controlled fee parameters.
///
/// Changing either field only affects fees computed afterwards; requests
/// already submitted keep the fee and token they were charged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeeConfig {
    /// Fee per request/response byte
    pub token_wei_per_byte: Amount,
    /// Token fees are charged in
    pub payment_token: Address,
}

impl FeeConfig {
    /// Create a fee configuration.
    pub fn new(token_wei_per_byte: Amount, payment_token: Address) -> Self {
        Self {
            token_wei_per_byte,
            payment_token,
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_WEI_PER_BYTE, ZERO_ADDRESS)
    }
}
