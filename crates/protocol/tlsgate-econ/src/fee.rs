//! Fee estimation.
//!
//! ```text
//! fee = (request_bytes + max_response_bytes) * token_wei_per_byte
//! ```
//!
//! Byte counts are caller-influenced and the rate is owner-controlled, so
//! every step is checked and overflow is reported as `EconError::Overflow`.

use tlsgate_crypto::Address;
use tlsgate_types::{Amount, FeeConfig};

use crate::error::{EconError, EconResult};

/// Estimate the fee for a request.
///
/// # Arguments
/// * `request_bytes` - Total length of the request's template values
/// * `max_response_bytes` - Upper bound on the response size
/// * `token_wei_per_byte` - Current fee rate
///
/// # Returns
/// The fee in payment token base units, or `Overflow`.
pub fn estimate_fee(
    request_bytes: u64,
    max_response_bytes: u64,
    token_wei_per_byte: Amount,
) -> EconResult<Amount> {
    let total_bytes = request_bytes
        .checked_add(max_response_bytes)
        .ok_or(EconError::Overflow)?;
    Amount::from(total_bytes)
        .checked_mul(token_wei_per_byte)
        .ok_or(EconError::Overflow)
}

/// Fee view used by deployments that price in bytes per token instead of
/// tokens per byte.
///
/// ```text
/// fee = (request_bytes + max_response_bytes) / bytes_per_token
/// ```
pub fn fee_for_bytes_per_token(
    request_bytes: u64,
    max_response_bytes: u64,
    bytes_per_token: Amount,
) -> EconResult<Amount> {
    if bytes_per_token == 0 {
        return Err(EconError::ZeroDivisor);
    }
    let total_bytes = request_bytes
        .checked_add(max_response_bytes)
        .ok_or(EconError::Overflow)?;
    Ok(Amount::from(total_bytes) / bytes_per_token)
}

/// Sum the lengths of a request's template values.
pub fn request_bytes(values: &[Vec<u8>]) -> EconResult<u64> {
    values.iter().try_fold(0u64, |acc, value| {
        let len = u64::try_from(value.len()).map_err(|_| EconError::Overflow)?;
        acc.checked_add(len).ok_or(EconError::Overflow)
    })
}

/// Check an offered fee against the required fee.
pub fn require_fee(offered: Amount, required: Amount) -> EconResult<()> {
    if offered < required {
        return Err(EconError::InsufficientFee { offered, required });
    }
    Ok(())
}

/// The owner-controlled fee configuration.
///
/// Rate and token changes only affect fees estimated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeMeter {
    config: FeeConfig,
}

impl FeeMeter {
    /// Create a meter from a fee configuration.
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    /// Estimate the fee at the current rate.
    pub fn estimate_fee(&self, request_bytes: u64, max_response_bytes: u64) -> EconResult<Amount> {
        estimate_fee(
            request_bytes,
            max_response_bytes,
            self.config.token_wei_per_byte,
        )
    }

    /// Current fee rate.
    pub fn token_wei_per_byte(&self) -> Amount {
        self.config.token_wei_per_byte
    }

    /// Current payment token.
    pub fn payment_token(&self) -> Address {
        self.config.payment_token
    }

    /// The full configuration.
    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    /// Set the fee rate.
    pub fn set_token_wei_per_byte(&mut self, rate: Amount) {
        tracing::debug!(
            old = self.config.token_wei_per_byte,
            new = rate,
            "fee rate updated"
        );
        self.config.token_wei_per_byte = rate;
    }

    /// Set the payment token.
    pub fn set_payment_token(&mut self, token: Address) {
        self.config.payment_token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlsgate_types::GWEI;

    #[test]
    fn test_estimate_fee() {
        assert_eq!(estimate_fee(96, 10_240, GWEI).unwrap(), 10_336 * GWEI);
        assert_eq!(estimate_fee(0, 0, GWEI).unwrap(), 0);
        assert_eq!(estimate_fee(10, 10, 0).unwrap(), 0);
    }

    #[test]
    fn test_estimate_fee_overflow() {
        assert_eq!(estimate_fee(u64::MAX, 1, 1), Err(EconError::Overflow));
        assert_eq!(estimate_fee(u64::MAX, 0, Amount::MAX), Err(EconError::Overflow));
        assert_eq!(estimate_fee(1, 0, Amount::MAX).unwrap(), Amount::MAX);
    }

    #[test]
    fn test_fee_for_bytes_per_token() {
        assert_eq!(fee_for_bytes_per_token(96, 10_240, 1).unwrap(), 10_336);
        assert_eq!(fee_for_bytes_per_token(96, 10_240, 1000).unwrap(), 10);
        assert_eq!(
            fee_for_bytes_per_token(1, 1, 0),
            Err(EconError::ZeroDivisor)
        );
    }

    #[test]
    fn test_request_bytes() {
        assert_eq!(request_bytes(&[]).unwrap(), 0);
        assert_eq!(
            request_bytes(&[vec![0; 32], vec![0; 32], vec![0; 32]]).unwrap(),
            96
        );
    }

    #[test]
    fn test_require_fee() {
        assert!(require_fee(10, 10).is_ok());
        assert!(require_fee(11, 10).is_ok());
        assert_eq!(
            require_fee(9, 10),
            Err(EconError::InsufficientFee {
                offered: 9,
                required: 10
            })
        );
    }

    #[test]
    fn test_fee_meter_setters() {
        let mut meter = FeeMeter::new(FeeConfig::new(GWEI, Address([1u8; 20])));
        assert_eq!(meter.estimate_fee(1, 1).unwrap(), 2 * GWEI);

        meter.set_token_wei_per_byte(5);
        meter.set_payment_token(Address([2u8; 20]));

        assert_eq!(meter.token_wei_per_byte(), 5);
        assert_eq!(meter.payment_token(), Address([2u8; 20]));
        assert_eq!(meter.estimate_fee(1, 1).unwrap(), 10);
    }
}
