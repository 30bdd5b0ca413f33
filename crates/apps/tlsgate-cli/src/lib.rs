//! Command-line tooling for the tlsgate request gateway.
//!
//! This crate provides the `tlsgate` binary. It includes commands for:
//!
//! - **Estimation**: fees and callback gas
//! - **Identifiers**: request ids and template-bound request hashes
//! - **Configuration**: print the effective TOML configuration
//! - **Simulation**: run submit and deliver in-process
//!
//! # Quick Start
//!
//! ```bash
//! # Fee for 96 request bytes and a 10 KiB response
//! tlsgate fee --request-bytes 96 --max-response-bytes 10240
//!
//! # Id of an account's first request at a gateway
//! tlsgate request-id --gateway 0x.. --account 0x.. --nonce 0
//!
//! # Walk a request through its lifecycle with a custom config
//! tlsgate --config tlsgate.toml simulate --response '{"ok":true}'
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format human` (default) or `--format json`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, OutputFormatArg};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};

/// Run a parsed command and return its rendered output.
pub fn run(cli: Cli) -> CliResult<String> {
    let format: OutputFormat = cli.format.into();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fee {
            request_bytes,
            max_response_bytes,
        } => commands::fee(&config, request_bytes, max_response_bytes, format),
        Commands::CallbackGas { response_len } => commands::callback_gas(response_len, format),
        Commands::RequestId {
            gateway,
            account,
            nonce,
        } => commands::request_id(&gateway, &account, nonce, format),
        Commands::RequestHash {
            remote,
            server_name,
            encrypted_key,
            template_hash,
            fields,
            values,
        } => commands::request_hash(
            &remote,
            &server_name,
            &encrypted_key,
            &template_hash,
            fields,
            &values,
            format,
        ),
        Commands::Config => commands::show_config(&config, format),
        Commands::Simulate {
            response,
            max_response_bytes,
        } => commands::simulate(config, &response, max_response_bytes, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_run_with_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fees]\ntoken_wei_per_byte = 3").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from([
            "tlsgate",
            "--config",
            &path,
            "--format",
            "json",
            "fee",
            "--request-bytes",
            "10",
            "--max-response-bytes",
            "20",
        ]);
        let out = run(cli).unwrap();
        assert!(out.contains("\"fee\": \"90\""));
    }

    #[test]
    fn test_run_missing_config() {
        let cli = Cli::parse_from(["tlsgate", "--config", "/nonexistent/tlsgate.toml", "config"]);
        let err = run(cli).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
