//! Configuration types for the operations layer.
//!
//! A [`ProtocolConfig`] can be built in code with the `with_*` methods or
//! loaded from a TOML file:
//!
//! ```toml
//! [fees]
//! token_wei_per_byte = 1000000000
//! payment_token = "0x1111111111111111111111111111111111111111"
//!
//! [gateway]
//! binding = "template"
//! request_ttl_ms = 600000
//!
//! [forwarder]
//! max_data_length = 131072
//! ```
//!
//! Missing sections and keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tlsgate_crypto::{Address, ZERO_ADDRESS};
use tlsgate_types::{
    Amount, FeeConfig, Gas, RequestHashBinding, DEFAULT_CALLBACK_GAS_LIMIT,
    DEFAULT_TOKEN_WEI_PER_BYTE, MAX_ENCRYPTED_KEY_LENGTH, MAX_FORWARD_DATA_LENGTH,
    MAX_PROOF_LENGTH, MAX_REMOTE_LENGTH, MAX_RESPONSE_BYTES_LIMIT, MAX_SERVER_NAME_LENGTH,
    MAX_TEMPLATE_FIELDS,
};
use tlsgate_valid::RequestLimits;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`ProtocolConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fee settings (`[fees]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSection {
    /// Price of one request or response byte, in token wei.
    pub token_wei_per_byte: u64,
    /// Token fees are paid in.
    pub payment_token: Address,
}

impl Default for FeeSection {
    fn default() -> Self {
        Self {
            token_wei_per_byte: DEFAULT_TOKEN_WEI_PER_BYTE as u64,
            payment_token: ZERO_ADDRESS,
        }
    }
}

/// Gateway settings (`[gateway]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Request hash binding for new submissions.
    pub binding: RequestHashBinding,
    /// Time after which an undelivered request may be expired and refunded.
    /// `None` disables expiry.
    pub request_ttl_ms: Option<u64>,
    /// Callback gas limit used when a submission does not name one.
    pub default_callback_gas: Gas,
    /// Largest `max_response_bytes` a submission may ask for.
    pub max_response_bytes_limit: u64,
    /// Maximum remote length.
    pub max_remote_length: usize,
    /// Maximum server name length.
    pub max_server_name_length: usize,
    /// Maximum number of template fields.
    pub max_template_fields: usize,
    /// Maximum encrypted key length.
    pub max_encrypted_key_length: usize,
    /// Maximum delivery proof length.
    pub max_proof_length: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            binding: RequestHashBinding::Template,
            request_ttl_ms: None,
            default_callback_gas: DEFAULT_CALLBACK_GAS_LIMIT,
            max_response_bytes_limit: MAX_RESPONSE_BYTES_LIMIT,
            max_remote_length: MAX_REMOTE_LENGTH,
            max_server_name_length: MAX_SERVER_NAME_LENGTH,
            max_template_fields: MAX_TEMPLATE_FIELDS,
            max_encrypted_key_length: MAX_ENCRYPTED_KEY_LENGTH,
            max_proof_length: MAX_PROOF_LENGTH,
        }
    }
}

/// Forwarder settings (`[forwarder]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwarderSection {
    /// Maximum forwarded calldata length.
    pub max_data_length: usize,
}

impl Default for ForwarderSection {
    fn default() -> Self {
        Self {
            max_data_length: MAX_FORWARD_DATA_LENGTH,
        }
    }
}

/// Configuration for protocol behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Fee settings.
    pub fees: FeeSection,
    /// Gateway settings.
    pub gateway: GatewaySection,
    /// Forwarder settings.
    pub forwarder: ForwarderSection,
}

impl ProtocolConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Set the fee rate in token wei per byte.
    pub fn with_token_wei_per_byte(mut self, rate: u64) -> Self {
        self.fees.token_wei_per_byte = rate;
        self
    }

    /// Set the payment token.
    pub fn with_payment_token(mut self, token: Address) -> Self {
        self.fees.payment_token = token;
        self
    }

    /// Set the request hash binding for new submissions.
    pub fn with_binding(mut self, binding: RequestHashBinding) -> Self {
        self.gateway.binding = binding;
        self
    }

    /// Enable request expiry after `ttl_ms` milliseconds.
    pub fn with_request_ttl(mut self, ttl_ms: u64) -> Self {
        self.gateway.request_ttl_ms = Some(ttl_ms);
        self
    }

    /// Set the default callback gas limit.
    pub fn with_default_callback_gas(mut self, gas: Gas) -> Self {
        self.gateway.default_callback_gas = gas;
        self
    }

    /// Set the largest response size a submission may request.
    pub fn with_max_response_bytes_limit(mut self, limit: u64) -> Self {
        self.gateway.max_response_bytes_limit = limit;
        self
    }

    /// The initial fee configuration.
    pub fn fee_config(&self) -> FeeConfig {
        FeeConfig::new(
            Amount::from(self.fees.token_wei_per_byte),
            self.fees.payment_token,
        )
    }

    /// The input limits the validator enforces.
    pub fn request_limits(&self) -> RequestLimits {
        RequestLimits {
            max_response_bytes_limit: self.gateway.max_response_bytes_limit,
            max_remote_length: self.gateway.max_remote_length,
            max_server_name_length: self.gateway.max_server_name_length,
            max_template_fields: self.gateway.max_template_fields,
            max_encrypted_key_length: self.gateway.max_encrypted_key_length,
            max_proof_length: self.gateway.max_proof_length,
            max_forward_data_length: self.forwarder.max_data_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_limits() {
        let config = ProtocolConfig::default();
        assert_eq!(config.request_limits(), RequestLimits::default());
        assert_eq!(config.gateway.binding, RequestHashBinding::Template);
        assert_eq!(config.gateway.request_ttl_ms, None);
        assert_eq!(config.fee_config(), FeeConfig::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ProtocolConfig::from_toml_str(
            r#"
            [fees]
            token_wei_per_byte = 5
            payment_token = "0x1111111111111111111111111111111111111111"

            [gateway]
            binding = "compact"
            request_ttl_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.fees.token_wei_per_byte, 5);
        assert_eq!(config.fees.payment_token, Address([0x11; 20]));
        assert_eq!(config.gateway.binding, RequestHashBinding::Compact);
        assert_eq!(config.gateway.request_ttl_ms, Some(1000));
        assert_eq!(config.gateway.default_callback_gas, DEFAULT_CALLBACK_GAS_LIMIT);
        assert_eq!(config.forwarder, ForwarderSection::default());
    }

    #[test]
    fn test_from_toml_empty() {
        let config = ProtocolConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProtocolConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_address() {
        let result = ProtocolConfig::from_toml_str(
            r#"
            [fees]
            payment_token = "0x1234"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_builders() {
        let config = ProtocolConfig::default()
            .with_token_wei_per_byte(7)
            .with_binding(RequestHashBinding::Compact)
            .with_request_ttl(60_000)
            .with_default_callback_gas(100_000)
            .with_max_response_bytes_limit(4096);

        assert_eq!(config.fee_config().token_wei_per_byte, 7);
        assert_eq!(config.gateway.binding, RequestHashBinding::Compact);
        assert_eq!(config.gateway.request_ttl_ms, Some(60_000));
        assert_eq!(config.gateway.default_callback_gas, 100_000);
        assert_eq!(config.request_limits().max_response_bytes_limit, 4096);
    }
}
