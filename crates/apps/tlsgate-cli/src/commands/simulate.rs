//! In-process simulation of the request lifecycle.

use std::sync::Arc;

use tlsgate_crypto::{keccak256, Address, Hash};
use tlsgate_econ::{request_bytes, GasMeter};
use tlsgate_ops::{
    CallbackError, GatewayError, Protocol, ProtocolConfig, ResponseHandler,
};
use tlsgate_store::TokenLedger;
use tlsgate_types::{GatewayId, SubmitRequest, TemplatedRequest};

use crate::error::CliResult;
use crate::output::{OutputFormat, Render, SimulateOutput};

const OWNER: Address = Address([0x01; 20]);
const MANAGER: Address = Address([0x02; 20]);
const GATEWAY: Address = Address([0x03; 20]);
const BEACON: Address = Address([0x04; 20]);
const GATEWAY_ID: GatewayId = 1;

/// Accepts every response.
struct AcceptAll;

impl ResponseHandler for AcceptAll {
    fn handle_response(
        &self,
        _gas: &mut GasMeter,
        request_id: &Hash,
        _request_hash: &Hash,
        response: &[u8],
    ) -> Result<(), CallbackError> {
        tracing::debug!(%request_id, len = response.len(), "simulated callback");
        Ok(())
    }
}

/// Execute the simulate command.
pub fn simulate(
    config: ProtocolConfig,
    response: &str,
    max_response_bytes: u64,
    format: OutputFormat,
) -> CliResult<String> {
    let mut protocol = Protocol::new(OWNER, MANAGER, config);
    let cap = protocol.owner_cap(&OWNER)?;
    protocol.set_gateway(&cap, GATEWAY_ID, GATEWAY)?;
    protocol.set_account_beacon(&cap, BEACON)?;
    let account = protocol.create_account(&cap, GATEWAY_ID, Arc::new(AcceptAll))?;

    let template = TemplatedRequest::new(
        keccak256(b"simulated request template"),
        keccak256(b"simulated response template"),
        vec![1],
        vec![b"simulated value".to_vec()],
    );
    let bytes = request_bytes(&template.values).map_err(GatewayError::from)?;
    let fee = protocol.estimate_fee(bytes, max_response_bytes)?;

    let token = protocol.payment_token();
    protocol
        .ledger_mut()
        .mint(&token, &account, fee)
        .map_err(GatewayError::from)?;

    let submit = SubmitRequest::new(
        "https://example.com/",
        "example.com",
        template,
        fee,
        max_response_bytes,
    );
    let receipt = protocol.submit(account, GATEWAY, submit)?;
    let delivery = protocol.deliver(
        GATEWAY,
        receipt.request_id,
        receipt.request_hash,
        response.as_bytes(),
        b"",
    )?;

    let output = SimulateOutput {
        gateway: GATEWAY.to_string(),
        account: account.to_string(),
        request_id: receipt.request_id.to_string(),
        request_hash: receipt.request_hash.to_string(),
        fee_paid: receipt.fee_paid.to_string(),
        gas_used: delivery.gas_used,
        events: protocol.events().to_vec(),
    };
    Ok(output.render(format))
}
