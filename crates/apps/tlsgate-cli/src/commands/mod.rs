//! CLI command implementations.

pub mod config;
pub mod estimate;
pub mod identifiers;
pub mod simulate;

// Re-export command handlers
pub use config::show_config;
pub use estimate::{callback_gas, fee};
pub use identifiers::{request_hash, request_id};
pub use simulate::simulate;

use std::path::Path;

use tlsgate_crypto::Hash;
use tlsgate_ops::ProtocolConfig;

use crate::error::{CliError, CliResult};

/// Load the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> CliResult<ProtocolConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Ok(ProtocolConfig::load(path)?)
        }
        None => Ok(ProtocolConfig::default()),
    }
}

/// Decode an optionally `0x`-prefixed hex argument.
pub fn parse_hex(s: &str) -> CliResult<Vec<u8>> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(body).map_err(|e| CliError::InvalidHex(format!("{}: {}", s, e)))
}

/// Decode a 32-byte hex argument.
pub fn parse_hash(s: &str) -> CliResult<Hash> {
    let bytes = parse_hex(s)?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CliError::InvalidHex(format!("{}: expected 32 bytes", s)))?;
    Ok(Hash(arr))
}
