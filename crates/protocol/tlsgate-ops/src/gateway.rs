//! Request gateway operations.
//!
//! A request moves through three states:
//!
//! ```text
//! submit ──► Submitted ──deliver──► Delivered
//!                │
//!                └──expire (after deadline)──► Expired (fee refunded)
//! ```
//!
//! `submit` charges the fee, derives the request id from the caller's
//! per-gateway nonce and emits `RequestBegin` for provers to pick up.
//! `deliver` checks the bound hash and the prover's proof, enforces the
//! response limit and calls the account's response handler under the
//! request's callback gas limit.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::{Address, Hash, Timestamp};
use tlsgate_econ::{estimate_callback_gas, request_bytes, require_fee, EconError, GasMeter};
use tlsgate_store::{AccountStore, ProverStore, RequestStore, TokenLedger};
use tlsgate_types::{
    Amount, Gas, GatewayEvent, RequestRecord, RequestState, SubmitRequest,
};
use tlsgate_valid::Validator;

use crate::error::{GatewayError, GatewayResult};
use crate::handlers::CallbackError;
use crate::identifier::{bind_request_hash, compute_request_id};
use crate::protocol::Protocol;
use crate::verifier::{lookup_prover, verify_entry};

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Id assigned to the request
    pub request_id: Hash,
    /// Hash the delivery must match
    pub request_hash: Hash,
    /// Nonce consumed by the submission
    pub nonce: u64,
    /// Fee transferred to the gateway
    pub fee_paid: Amount,
    /// Fee required at the current rate
    pub required_fee: Amount,
    /// Time after which the request may be expired
    pub deadline: Option<Timestamp>,
}

/// Outcome of an accepted delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Delivered request
    pub request_id: Hash,
    /// Gas consumed by the response callback
    pub gas_used: Gas,
}

fn callback_failure(err: CallbackError, limit: Gas) -> GatewayError {
    match err {
        CallbackError::Gas(EconError::OutOfGas { .. }) => GatewayError::OutOfGas { limit },
        other => GatewayError::CallbackFailed(other.to_string()),
    }
}

impl<V: Validator> Protocol<V> {
    /// Submit a request through a gateway.
    ///
    /// # Arguments
    /// * `caller` - Account proxy submitting the request
    /// * `gateway` - Gateway the request is addressed to
    /// * `submit` - Request parameters and offered fee
    ///
    /// # Returns
    /// A receipt with the request id and bound hash.
    ///
    /// # Errors
    /// - `UnknownGateway` if `gateway` is not registered
    /// - `Unauthorized` if `caller` may not use `gateway`
    /// - `InvalidRequest` for malformed input
    /// - `InsufficientFee` if the offered fee is below the estimate
    /// - `UnknownProver` if a named prover is not registered
    /// - `InsufficientBalance` if the caller cannot pay the fee
    /// - `Overflow` if a fee or nonce computation overflows
    pub fn submit(
        &mut self,
        caller: Address,
        gateway: Address,
        submit: SubmitRequest,
    ) -> GatewayResult<SubmitReceipt> {
        let result = self.transact(|state, runtime| {
            // 1. Authorization
            if !state.accounts.is_gateway(&gateway) {
                return Err(GatewayError::unknown_gateway(&gateway));
            }
            if !state.accounts.check_access(&caller, &gateway) {
                return Err(GatewayError::Unauthorized(caller));
            }

            // 2. Input shape
            runtime.validator.validate_submit(&submit)?;

            // 3. Fee
            let request_bytes = request_bytes(&submit.template.values)?;
            let required_fee = state
                .fees
                .estimate_fee(request_bytes, submit.max_response_bytes)?;
            require_fee(submit.fee, required_fee)?;

            // 4. Prover
            if let Some(prover_id) = &submit.prover_id {
                lookup_prover(state, prover_id)?;
            }

            // 5. Payment
            let payment_token = state.fees.payment_token();
            state
                .ledger
                .transfer(&payment_token, &caller, &gateway, submit.fee)?;

            // 6. Identifiers
            let nonce = state.requests.consume_nonce(&gateway, &caller)?;
            let request_id = compute_request_id(&gateway, &caller, nonce);
            let binding = runtime.config.gateway.binding;
            let request_hash = bind_request_hash(binding, &request_id, &caller, nonce, &submit);

            let deadline = match runtime.config.gateway.request_ttl_ms {
                Some(ttl) => Some(state.now.checked_add(ttl).ok_or(EconError::Overflow)?),
                None => None,
            };
            let callback_gas_limit = submit
                .callback_gas_limit
                .unwrap_or(runtime.config.gateway.default_callback_gas);

            // 7. Record
            state.requests.insert(RequestRecord {
                request_id,
                gateway,
                requester: caller,
                nonce,
                request_hash,
                binding,
                prover_id: submit.prover_id,
                max_response_bytes: submit.max_response_bytes,
                fee_paid: submit.fee,
                payment_token,
                callback_gas_limit,
                submitted_at: state.now,
                deadline,
                state: RequestState::Submitted,
            })?;
            if let Some(prover_id) = &submit.prover_id {
                state.provers.acquire(prover_id)?;
            }

            tracing::info!(
                %request_id,
                %gateway,
                requester = %caller,
                nonce,
                fee = submit.fee,
                "request submitted"
            );
            state.events.emit(GatewayEvent::RequestBegin {
                request_id,
                gateway,
                requester: caller,
                prover_id: submit.prover_id,
                request_template_hash: submit.template.request_template_hash,
                response_template_hash: submit.template.response_template_hash,
                remote: submit.remote.clone(),
                server_name: submit.server_name.clone(),
                encrypted_key: submit.encrypted_key.clone(),
                max_response_bytes: submit.max_response_bytes,
                fee: submit.fee,
            });

            Ok(SubmitReceipt {
                request_id,
                request_hash,
                nonce,
                fee_paid: submit.fee,
                required_fee,
                deadline,
            })
        });

        if let Err(e) = &result {
            tracing::debug!(%gateway, requester = %caller, error = %e, "submission rejected");
        }
        result
    }

    /// Deliver a response for a pending request.
    ///
    /// # Arguments
    /// * `gateway` - Gateway delivering the response
    /// * `request_id` - Request being answered
    /// * `request_hash` - Hash the gateway claims the request was bound to
    /// * `response` - Response bytes
    /// * `proof` - Proof for the request's prover (ignored without one)
    ///
    /// # Errors
    /// - `UnknownRequest` if no such request was submitted through `gateway`
    /// - `AlreadyDelivered`, `RequestExpired` by record state
    /// - `Unauthorized` if the requester lost access to `gateway`
    /// - `HashMismatch` if `request_hash` differs from the bound hash
    /// - `InvalidProof` if the prover rejects the proof
    /// - `ResponseTooLarge` if the response exceeds the request's limit
    /// - `CallbackFailed` / `OutOfGas` if the response handler fails
    pub fn deliver(
        &mut self,
        gateway: Address,
        request_id: Hash,
        request_hash: Hash,
        response: &[u8],
        proof: &[u8],
    ) -> GatewayResult<DeliveryReceipt> {
        let result = self.transact(|state, runtime| {
            // 1. Record state
            let record = state
                .requests
                .get(&request_id)
                .ok_or(GatewayError::UnknownRequest(request_id))?;
            // Each gateway only answers requests paid through it.
            if record.gateway != gateway {
                return Err(GatewayError::UnknownRequest(request_id));
            }
            match record.state {
                RequestState::Submitted => {}
                RequestState::Delivered => return Err(GatewayError::AlreadyDelivered(request_id)),
                RequestState::Expired => return Err(GatewayError::RequestExpired(request_id)),
            }
            if record.deadline_passed(state.now) {
                return Err(GatewayError::RequestExpired(request_id));
            }

            // 2. Authorization
            if !state.accounts.check_access(&record.requester, &gateway) {
                return Err(GatewayError::Unauthorized(record.requester));
            }

            // 3. Binding
            if request_hash != record.request_hash {
                return Err(GatewayError::HashMismatch {
                    expected: record.request_hash,
                    actual: request_hash,
                });
            }

            // 4. Proof
            if let Some(prover_id) = &record.prover_id {
                runtime.validator.validate_proof(proof)?;
                let entry = lookup_prover(state, prover_id)?;
                if !verify_entry(runtime, &entry, &record.request_hash, response, proof)? {
                    return Err(GatewayError::InvalidProof(request_id));
                }
            }

            // 5. Size
            runtime
                .validator
                .validate_response(response, record.max_response_bytes)?;

            // 6. Callback
            let limit = record.callback_gas_limit;
            let handler = runtime.handlers.get(&record.requester).ok_or_else(|| {
                GatewayError::CallbackFailed(format!(
                    "no response handler for {}",
                    record.requester
                ))
            })?;
            let mut meter = GasMeter::new(limit);
            let dispatch = estimate_callback_gas(response.len() as u64)?;
            meter
                .charge(dispatch)
                .map_err(|e| callback_failure(e.into(), limit))?;
            handler
                .handle_response(&mut meter, &request_id, &record.request_hash, response)
                .map_err(|e| callback_failure(e, limit))?;

            // 7. Settle
            state.requests.set_state(&request_id, RequestState::Delivered)?;
            if let Some(prover_id) = &record.prover_id {
                state.provers.release(prover_id)?;
            }

            let gas_used = meter.used();
            tracing::info!(%request_id, %gateway, gas_used, "request delivered");
            state
                .events
                .emit(GatewayEvent::RequestEnd { request_id, gas_used });

            Ok(DeliveryReceipt {
                request_id,
                gas_used,
            })
        });

        if let Err(e) = &result {
            tracing::warn!(%request_id, %gateway, error = %e, "delivery rejected");
        }
        result
    }

    /// Expire an undelivered request whose deadline has passed and refund
    /// its fee to the requester.
    ///
    /// # Returns
    /// The refunded amount.
    ///
    /// # Errors
    /// - `UnknownRequest` if no such request exists
    /// - `Unauthorized` if `gateway` is not the request's gateway
    /// - `AlreadyDelivered` / `RequestExpired` if the request is terminal
    /// - `ExpiryDisabled` if the request has no deadline
    /// - `NotExpired` before the deadline
    /// - `InsufficientBalance` if the gateway cannot cover the refund
    pub fn expire(&mut self, gateway: Address, request_id: Hash) -> GatewayResult<Amount> {
        self.transact(|state, _| {
            let record = state
                .requests
                .get(&request_id)
                .ok_or(GatewayError::UnknownRequest(request_id))?;
            if record.gateway != gateway {
                return Err(GatewayError::Unauthorized(gateway));
            }
            match record.state {
                RequestState::Submitted => {}
                RequestState::Delivered => return Err(GatewayError::AlreadyDelivered(request_id)),
                RequestState::Expired => return Err(GatewayError::RequestExpired(request_id)),
            }
            let deadline = record.deadline.ok_or(GatewayError::ExpiryDisabled)?;
            if !record.deadline_passed(state.now) {
                return Err(GatewayError::NotExpired {
                    request_id,
                    deadline,
                });
            }

            state.ledger.transfer(
                &record.payment_token,
                &record.gateway,
                &record.requester,
                record.fee_paid,
            )?;
            state.requests.set_state(&request_id, RequestState::Expired)?;
            if let Some(prover_id) = &record.prover_id {
                state.provers.release(prover_id)?;
            }

            tracing::info!(%request_id, refunded = record.fee_paid, "request expired");
            state.events.emit(GatewayEvent::RequestExpired {
                request_id,
                requester: record.requester,
                refunded: record.fee_paid,
            });
            Ok(record.fee_paid)
        })
    }

    /// Estimate the callback gas a response of `response_len` bytes needs
    /// before the handler does any work of its own.
    pub fn estimate_callback_gas(&self, response_len: u64) -> GatewayResult<Gas> {
        Ok(estimate_callback_gas(response_len)?)
    }
}
