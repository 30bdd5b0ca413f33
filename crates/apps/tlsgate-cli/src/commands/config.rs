//! Show the effective configuration.

use tlsgate_ops::ProtocolConfig;

use crate::error::CliResult;
use crate::output::OutputFormat;

/// Execute the config command.
pub fn show_config(config: &ProtocolConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Human => Ok(toml::to_string_pretty(config)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = ProtocolConfig::default().with_request_ttl(30_000);
        let rendered = show_config(&config, OutputFormat::Human).unwrap();
        assert!(rendered.contains("request_ttl_ms = 30000"));
        assert_eq!(ProtocolConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
