//! Fee and callback gas estimates.

use tlsgate_crypto::address_to_string;
use tlsgate_econ::estimate_callback_gas;
use tlsgate_ops::{GatewayError, ProtocolConfig};

use crate::error::CliResult;
use crate::output::{CallbackGasOutput, FeeOutput, OutputFormat, Render};

/// Execute the fee command.
pub fn fee(
    config: &ProtocolConfig,
    request_bytes: u64,
    max_response_bytes: u64,
    format: OutputFormat,
) -> CliResult<String> {
    let meter = tlsgate_econ::FeeMeter::new(config.fee_config());
    let fee = meter
        .estimate_fee(request_bytes, max_response_bytes)
        .map_err(GatewayError::from)?;

    let output = FeeOutput {
        request_bytes,
        max_response_bytes,
        token_wei_per_byte: meter.token_wei_per_byte().to_string(),
        payment_token: address_to_string(&meter.payment_token()),
        fee: fee.to_string(),
    };
    Ok(output.render(format))
}

/// Execute the callback-gas command.
pub fn callback_gas(response_len: u64, format: OutputFormat) -> CliResult<String> {
    let gas = estimate_callback_gas(response_len).map_err(GatewayError::from)?;
    Ok(CallbackGasOutput { response_len, gas }.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tlsgate_types::ErrorCode;

    #[test]
    fn test_fee_at_default_rate() {
        let out = fee(&ProtocolConfig::default(), 96, 10_240, OutputFormat::Json).unwrap();
        assert!(out.contains("\"fee\": \"10336000000000\""));
    }

    #[test]
    fn test_fee_overflow() {
        let err = fee(&ProtocolConfig::default(), u64::MAX, 1, OutputFormat::Human).unwrap_err();
        assert!(matches!(err, CliError::Gateway(_)));
        assert_eq!(err.error_code(), ErrorCode::Overflow);
    }

    #[test]
    fn test_callback_gas() {
        let out = callback_gas(100, OutputFormat::Json).unwrap();
        assert!(out.contains("\"gas\": 51600"));
    }
}
