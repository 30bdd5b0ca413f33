//! Meta-transaction forwarder.
//!
//! A signer authorizes a call off-chain by signing
//! `keccak256(abi.encode(from, to, value, gas, nonce, data))` as a personal
//! message; any relayer may then execute it. The target receives
//! `data || from` so it can recover the original sender.
//!
//! The signer's nonce is consumed as soon as the signature and nonce check
//! out. A reverting target yields `success: false` but the nonce stays
//! consumed, so a signed request can run at most once.

use tlsgate_crypto::{recover_signer, Address, Signature};
use tlsgate_econ::GasMeter;
use tlsgate_store::NonceStore;
use tlsgate_types::{ForwardOutcome, ForwardRequest, GatewayEvent, FORWARD_GAS_PER_BYTE};
use tlsgate_valid::Validator;
use tlsgate_wire::forward_request_digest;

use crate::error::{GatewayError, GatewayResult};
use crate::handlers::{CallContext, CallError};
use crate::protocol::Protocol;

/// Recover the signer of a forward request, if the signature is well formed.
pub fn forward_signer(request: &ForwardRequest, signature: &Signature) -> Option<Address> {
    let digest = forward_request_digest(request);
    recover_signer(&digest, signature).ok()
}

/// Calldata passed to the target: `data || from`.
fn forwarded_calldata(request: &ForwardRequest) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(request.data.len() + 20);
    calldata.extend_from_slice(&request.data);
    calldata.extend_from_slice(request.from.as_bytes());
    calldata
}

impl<V: Validator> Protocol<V> {
    /// Next forwarder nonce of `from`.
    pub fn nonce_of(&self, from: &Address) -> u64 {
        self.state().forwarder_nonces.nonce_of(from)
    }

    /// Whether `signature` is `request.from`'s signature over `request` and
    /// `request.nonce` is its next nonce.
    pub fn verify_forward(&self, request: &ForwardRequest, signature: &Signature) -> bool {
        forward_signer(request, signature) == Some(request.from)
            && request.nonce == self.nonce_of(&request.from)
    }

    /// Execute a signed forward request.
    ///
    /// # Arguments
    /// * `relayer` - Address submitting the request
    /// * `request` - The signed request
    /// * `signature` - `v || r || s` signature by `request.from`
    ///
    /// # Returns
    /// The call outcome. A failing target is reported in the outcome, not
    /// as an error.
    ///
    /// # Errors
    /// - `InvalidRequest` for a zero target or oversized calldata
    /// - `InvalidSignature` if the signature does not recover to `from`
    /// - `InvalidNonce` if `request.nonce` is not the next nonce
    /// - `UnknownTarget` if nothing is registered at `request.to`
    pub fn execute(
        &mut self,
        relayer: Address,
        request: ForwardRequest,
        signature: &Signature,
    ) -> GatewayResult<ForwardOutcome> {
        self.transact(|state, runtime| {
            runtime.validator.validate_forward(&request)?;

            if forward_signer(&request, signature) != Some(request.from) {
                tracing::warn!(from = %request.from, %relayer, "forward signature rejected");
                return Err(GatewayError::InvalidSignature(request.from));
            }

            let expected = state.forwarder_nonces.nonce_of(&request.from);
            if request.nonce != expected {
                return Err(GatewayError::InvalidNonce {
                    expected,
                    actual: request.nonce,
                });
            }

            let target = runtime
                .targets
                .get(&request.to)
                .ok_or(GatewayError::UnknownTarget(request.to))?;

            state.forwarder_nonces.consume(&request.from)?;

            let calldata = forwarded_calldata(&request);
            let ctx = CallContext {
                relayer,
                value: request.value,
            };
            let mut meter = GasMeter::new(request.gas);
            let result = meter
                .charge(FORWARD_GAS_PER_BYTE.saturating_mul(calldata.len() as u64))
                .map_err(CallError::from)
                .and_then(|_| target.call(&ctx, &mut meter, &calldata));

            let outcome = match result {
                Ok(return_data) => ForwardOutcome {
                    success: true,
                    return_data,
                    gas_used: meter.used(),
                },
                Err(e) => {
                    tracing::warn!(from = %request.from, to = %request.to, error = %e, "forwarded call failed");
                    ForwardOutcome {
                        success: false,
                        return_data: e.to_string().into_bytes(),
                        gas_used: meter.used(),
                    }
                }
            };

            tracing::info!(
                from = %request.from,
                to = %request.to,
                nonce = request.nonce,
                success = outcome.success,
                "request forwarded"
            );
            state.events.emit(GatewayEvent::Forwarded {
                from: request.from,
                to: request.to,
                nonce: request.nonce,
                success: outcome.success,
                gas_used: outcome.gas_used,
            });
            Ok(outcome)
        })
    }
}
