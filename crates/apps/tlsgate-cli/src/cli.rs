//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// tlsgate request gateway CLI.
#[derive(Parser, Debug)]
#[command(name = "tlsgate")]
#[command(author = "tlsgate contributors")]
#[command(version)]
#[command(about = "Command-line tooling for the tlsgate request gateway")]
#[command(
    long_about = "Offline tooling for tlsgate clients and gateway operators: fee estimates,\nrequest identifiers and an in-process simulation of the request lifecycle."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "TLSGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // Estimation
    // =========================================================================
    /// Estimate the fee for a request.
    ///
    /// Uses the fee rate from the configuration.
    Fee {
        /// Total length of the template values, in bytes.
        #[arg(long)]
        request_bytes: u64,

        /// Maximum response size, in bytes.
        #[arg(long)]
        max_response_bytes: u64,
    },

    /// Estimate the callback gas for delivering a response.
    CallbackGas {
        /// Response length in bytes.
        response_len: u64,
    },

    // =========================================================================
    // Identifiers
    // =========================================================================
    /// Compute a request id.
    RequestId {
        /// Gateway address (0x-prefixed).
        #[arg(long)]
        gateway: String,

        /// Account proxy address (0x-prefixed).
        #[arg(long)]
        account: String,

        /// Request nonce of the account at the gateway.
        #[arg(long, default_value = "0")]
        nonce: u64,
    },

    /// Compute the template-bound request hash.
    RequestHash {
        /// Remote endpoint.
        #[arg(long)]
        remote: String,

        /// TLS server name.
        #[arg(long)]
        server_name: String,

        /// Encrypted key material (hex).
        #[arg(long, default_value = "")]
        encrypted_key: String,

        /// Request template hash (32-byte hex).
        #[arg(long)]
        template_hash: String,

        /// Template field tag; repeat once per value.
        #[arg(long = "field")]
        fields: Vec<u64>,

        /// Template value (hex); repeat once per field.
        #[arg(long = "value")]
        values: Vec<String>,
    },

    // =========================================================================
    // Configuration & Simulation
    // =========================================================================
    /// Print the effective configuration as TOML.
    Config,

    /// Run a request through submit and deliver in-process.
    ///
    /// Sets up a gateway and a funded account, submits a request, delivers
    /// the response and prints the receipts and emitted events.
    Simulate {
        /// Response body to deliver.
        #[arg(long, default_value = "{}")]
        response: String,

        /// Maximum response size of the simulated request.
        #[arg(long, default_value = "1024")]
        max_response_bytes: u64,
    },
}
