//! Owner operations: provers, fees, fee withdrawal and ownership.

use tlsgate_crypto::Address;
use tlsgate_store::{ProverStore, TokenLedger};
use tlsgate_types::{Amount, GatewayEvent, ProverEntry, ProverId, VerifierKind};
use tlsgate_valid::Validator;

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::Protocol;
use crate::state::OwnerCap;

impl<V: Validator> Protocol<V> {
    // =========================================================================
    // Prover Registry
    // =========================================================================

    /// Register or replace a prover.
    ///
    /// # Errors
    /// - `Unauthorized` if `cap` is stale
    /// - `ProverInUse` if the prover being replaced has requests in flight;
    ///   use [`migrate_prover`](Self::migrate_prover) to replace it anyway
    pub fn set_prover(
        &mut self,
        cap: &OwnerCap,
        prover_id: ProverId,
        verifier: VerifierKind,
        verification_key: Vec<u8>,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;

            if let Some(existing) = state.provers.get_prover(&prover_id) {
                if existing.is_in_use() {
                    return Err(GatewayError::ProverInUse {
                        prover_id,
                        in_flight: existing.in_flight,
                    });
                }
            }

            tracing::info!(prover = %prover_id, %verifier, "prover set");
            state.provers.put_prover(ProverEntry::new(
                prover_id,
                verifier.clone(),
                verification_key,
            ));
            state.events.emit(GatewayEvent::ProverSet {
                prover_id,
                verifier,
                migrated: false,
            });
            Ok(())
        })
    }

    /// Replace a prover even while requests reference it.
    ///
    /// Pending requests keep their reference and are verified with the new
    /// verifier on delivery.
    pub fn migrate_prover(
        &mut self,
        cap: &OwnerCap,
        prover_id: ProverId,
        verifier: VerifierKind,
        verification_key: Vec<u8>,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;

            let in_flight = state
                .provers
                .get_prover(&prover_id)
                .map(|entry| entry.in_flight)
                .unwrap_or(0);
            tracing::warn!(
                prover = %prover_id,
                %verifier,
                in_flight,
                "migrating prover"
            );

            state.provers.put_prover(ProverEntry::new(
                prover_id,
                verifier.clone(),
                verification_key,
            ));
            state.events.emit(GatewayEvent::ProverSet {
                prover_id,
                verifier,
                migrated: true,
            });
            Ok(())
        })
    }

    // =========================================================================
    // Fees
    // =========================================================================

    /// Estimate the fee for a request at the current rate.
    pub fn estimate_fee(&self, request_bytes: u64, max_response_bytes: u64) -> GatewayResult<Amount> {
        Ok(self
            .state()
            .fees
            .estimate_fee(request_bytes, max_response_bytes)?)
    }

    /// Current fee rate in token wei per byte.
    pub fn token_wei_per_byte(&self) -> Amount {
        self.state().fees.token_wei_per_byte()
    }

    /// Current payment token.
    pub fn payment_token(&self) -> Address {
        self.state().fees.payment_token()
    }

    /// Set the fee rate. Pending requests keep the fee they paid.
    pub fn set_token_wei_per_byte(&mut self, cap: &OwnerCap, rate: Amount) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            state.fees.set_token_wei_per_byte(rate);
            tracing::info!(token_wei_per_byte = rate, "fee rate set");
            state.events.emit(GatewayEvent::FeeRateSet {
                token_wei_per_byte: rate,
            });
            Ok(())
        })
    }

    /// Set the payment token. Pending requests are refunded in the token
    /// they paid with.
    pub fn set_payment_token(&mut self, cap: &OwnerCap, token: Address) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            state.fees.set_payment_token(token);
            tracing::info!(payment_token = %token, "payment token set");
            state.events.emit(GatewayEvent::PaymentTokenSet {
                payment_token: token,
            });
            Ok(())
        })
    }

    /// Withdraw collected fees from a gateway.
    ///
    /// # Errors
    /// - `InsufficientBalance` if the gateway holds less than `amount`
    pub fn claim_fee(
        &mut self,
        cap: &OwnerCap,
        gateway: Address,
        amount: Amount,
        recipient: Address,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            let token = state.fees.payment_token();
            state.ledger.transfer(&token, &gateway, &recipient, amount)?;
            tracing::info!(%gateway, %recipient, amount, "fee claimed");
            state.events.emit(GatewayEvent::FeeClaimed {
                gateway,
                recipient,
                amount,
            });
            Ok(())
        })
    }

    /// Move payment tokens `from` has approved to the account manager.
    ///
    /// # Errors
    /// - `InsufficientBalance` if the allowance or balance is too small
    pub fn transfer_payment_token(
        &mut self,
        cap: &OwnerCap,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            let token = state.fees.payment_token();
            let spender = state.manager;
            state
                .ledger
                .transfer_from(&token, &spender, &from, &to, amount)?;
            tracing::info!(%from, %to, amount, "payment token transferred");
            Ok(())
        })
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Hand the owner role to `new_owner`. Capabilities issued to the
    /// previous owner stop working.
    pub fn transfer_ownership(&mut self, cap: &OwnerCap, new_owner: Address) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            if new_owner.is_zero() {
                return Err(GatewayError::ZeroOwner);
            }
            let previous_owner = state.owner;
            state.owner = new_owner;
            tracing::info!(%previous_owner, %new_owner, "ownership transferred");
            state.events.emit(GatewayEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            });
            Ok(())
        })
    }
}
