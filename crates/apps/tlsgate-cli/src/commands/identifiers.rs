//! Request id and request hash computation.
//!
//! Gateways and clients can recompute both values off-chain and compare them
//! with the `RequestBegin` event.

use tlsgate_crypto::{address_from_string, ZERO_HASH};
use tlsgate_ops::{compute_request_hash, compute_request_id};
use tlsgate_types::TemplatedRequest;

use crate::commands::{parse_hash, parse_hex};
use crate::error::{CliError, CliResult};
use crate::output::{HashOutput, OutputFormat, Render};

/// Execute the request-id command.
pub fn request_id(
    gateway: &str,
    account: &str,
    nonce: u64,
    format: OutputFormat,
) -> CliResult<String> {
    let gateway = address_from_string(gateway)?;
    let account = address_from_string(account)?;
    let id = compute_request_id(&gateway, &account, nonce);
    Ok(HashOutput {
        label: "Request id",
        hash: id.to_string(),
    }
    .render(format))
}

/// Execute the request-hash command.
pub fn request_hash(
    remote: &str,
    server_name: &str,
    encrypted_key: &str,
    template_hash: &str,
    fields: Vec<u64>,
    values: &[String],
    format: OutputFormat,
) -> CliResult<String> {
    if fields.len() != values.len() {
        return Err(CliError::user(format!(
            "{} fields but {} values; pass one --field per --value",
            fields.len(),
            values.len()
        )));
    }

    let encrypted_key = parse_hex(encrypted_key)?;
    let values = values
        .iter()
        .map(|v| parse_hex(v))
        .collect::<CliResult<Vec<_>>>()?;
    // The response template is not part of the bound hash.
    let template = TemplatedRequest::new(parse_hash(template_hash)?, ZERO_HASH, fields, values);

    let hash = compute_request_hash(remote, server_name, &encrypted_key, &template);
    Ok(HashOutput {
        label: "Request hash",
        hash: hash.to_string(),
    }
    .render(format))
}
