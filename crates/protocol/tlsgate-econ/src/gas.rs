//! Gas metering.
//!
//! Callbacks and forwarded calls run against a [`GasMeter`] with a fixed
//! limit. The callee charges the meter as it works; exceeding the limit
//! fails the charge and leaves the meter saturated at its limit.

use tlsgate_types::{Gas, CALLBACK_GAS_BASE, CALLBACK_GAS_PER_BYTE};

use crate::error::{EconError, EconResult};

/// A bounded gas counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasMeter {
    limit: Gas,
    used: Gas,
}

impl GasMeter {
    /// Create a meter with the given limit.
    pub fn new(limit: Gas) -> Self {
        Self { limit, used: 0 }
    }

    /// Charge `amount` gas.
    ///
    /// # Errors
    /// - `OutOfGas` if the charge would exceed the limit. The meter is
    ///   then exhausted.
    pub fn charge(&mut self, amount: Gas) -> EconResult<()> {
        let needed = self.used.saturating_add(amount);
        if needed > self.limit {
            self.used = self.limit;
            return Err(EconError::OutOfGas {
                limit: self.limit,
                needed,
            });
        }
        self.used = needed;
        Ok(())
    }

    /// Gas used so far.
    pub fn used(&self) -> Gas {
        self.used
    }

    /// Gas still available.
    pub fn remaining(&self) -> Gas {
        self.limit - self.used
    }

    /// The meter's limit.
    pub fn limit(&self) -> Gas {
        self.limit
    }
}

/// Estimate the callback gas for delivering a response of `response_len`
/// bytes.
///
/// ```text
/// gas = CALLBACK_GAS_BASE + CALLBACK_GAS_PER_BYTE * response_len
/// ```
pub fn estimate_callback_gas(response_len: u64) -> EconResult<Gas> {
    CALLBACK_GAS_PER_BYTE
        .checked_mul(response_len)
        .and_then(|bytes_gas| bytes_gas.checked_add(CALLBACK_GAS_BASE))
        .ok_or(EconError::Overflow)
}
