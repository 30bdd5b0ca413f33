//! Account manager operations.
//!
//! The account registry is the only authorization gate for requests: an
//! account may submit through a gateway, and receive deliveries from it,
//! only while it is bound to that gateway and enabled.

use std::sync::Arc;

use tlsgate_crypto::Address;
use tlsgate_store::AccountStore;
use tlsgate_types::{AuthorizedAccount, GatewayEvent, GatewayId};
use tlsgate_valid::Validator;
use tlsgate_wire::account_address;

use crate::error::{GatewayError, GatewayResult};
use crate::handlers::ResponseHandler;
use crate::protocol::Protocol;
use crate::state::OwnerCap;

impl<V: Validator> Protocol<V> {
    /// Whether `account` may use `gateway`.
    pub fn check_access(&self, account: &Address, gateway: &Address) -> bool {
        self.state().accounts.check_access(account, gateway)
    }

    /// Look up an account.
    pub fn get_account(&self, account: &Address) -> Option<AuthorizedAccount> {
        self.state().accounts.get_account(account)
    }

    /// Gateway registered under `gateway_id`.
    pub fn gateway(&self, gateway_id: GatewayId) -> Option<Address> {
        self.state().accounts.gateway(gateway_id)
    }

    /// Enable or disable an account without changing its gateway.
    pub fn set_proxy_account(
        &mut self,
        cap: &OwnerCap,
        account: Address,
        enabled: bool,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            state.accounts.set_enabled(&account, enabled);
            tracing::info!(%account, enabled, "proxy account set");
            state
                .events
                .emit(GatewayEvent::ProxyAccountSet { account, enabled });
            Ok(())
        })
    }

    /// Bind an account to a gateway and enable it.
    pub fn set_account_to_gateway(
        &mut self,
        cap: &OwnerCap,
        account: Address,
        gateway: Address,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            state
                .accounts
                .put_account(AuthorizedAccount::new(account, gateway));
            tracing::info!(%account, %gateway, "account bound to gateway");
            state
                .events
                .emit(GatewayEvent::AccountGatewaySet { account, gateway });
            Ok(())
        })
    }

    /// Register a gateway address under an id.
    pub fn set_gateway(
        &mut self,
        cap: &OwnerCap,
        gateway_id: GatewayId,
        gateway: Address,
    ) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            if gateway.is_zero() {
                return Err(GatewayError::unknown_gateway(&gateway));
            }
            state.accounts.set_gateway(gateway_id, gateway);
            tracing::info!(gateway_id, %gateway, "gateway set");
            state
                .events
                .emit(GatewayEvent::GatewaySet { gateway_id, gateway });
            Ok(())
        })
    }

    /// Set the beacon new account proxies are created from.
    pub fn set_account_beacon(&mut self, cap: &OwnerCap, beacon: Address) -> GatewayResult<()> {
        self.transact(|state, _| {
            state.require_owner(cap)?;
            state.accounts.set_beacon(beacon);
            tracing::info!(%beacon, "account beacon set");
            state.events.emit(GatewayEvent::AccountBeaconSet { beacon });
            Ok(())
        })
    }

    /// Provision an account proxy for a gateway.
    ///
    /// The proxy address is derived from the manager address, the gateway id
    /// and a creation counter, so it is known before the call returns and
    /// never collides with an earlier proxy.
    ///
    /// # Arguments
    /// * `cap` - Owner capability
    /// * `gateway_id` - Registered gateway the account is bound to
    /// * `handler` - Receives the account's delivered responses
    ///
    /// # Returns
    /// The new account address, bound and enabled.
    ///
    /// # Errors
    /// - `BeaconNotSet` if no account beacon is configured
    /// - `UnknownGateway` if `gateway_id` is not registered
    pub fn create_account(
        &mut self,
        cap: &OwnerCap,
        gateway_id: GatewayId,
        handler: Arc<dyn ResponseHandler>,
    ) -> GatewayResult<Address> {
        let account = self.transact(|state, _| {
            state.require_owner(cap)?;
            if state.accounts.beacon().is_none() {
                return Err(GatewayError::BeaconNotSet);
            }
            let gateway = state
                .accounts
                .gateway(gateway_id)
                .ok_or_else(|| GatewayError::unknown_gateway_id(gateway_id))?;

            let index = state.accounts.next_account_index()?;
            let account = account_address(&state.manager, gateway_id, index);
            state
                .accounts
                .put_account(AuthorizedAccount::new(account, gateway));

            tracing::info!(%account, gateway_id, %gateway, index, "account created");
            state.events.emit(GatewayEvent::AccountCreated {
                gateway_id,
                gateway,
                account,
            });
            Ok(account)
        })?;

        self.runtime.handlers.insert(account, handler);
        Ok(account)
    }
}
