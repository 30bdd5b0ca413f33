//! Main `Protocol` implementation.
//!
//! `Protocol` owns the [`ProtocolState`] and the registered capabilities
//! (response handlers, external verifiers, call targets). Operations are
//! implemented in the sibling modules as further `impl` blocks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tlsgate_crypto::{Address, Hash, Timestamp};
use tlsgate_store::{MemoryLedger, RequestStore, TokenLedger, Transactional};
use tlsgate_types::{Amount, GatewayEvent, RequestRecord};
use tlsgate_valid::{DefaultValidator, Validator};

use crate::config::ProtocolConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::handlers::{CallTarget, ResponseHandler, ResponseVerifier};
use crate::state::{OwnerCap, ProtocolState};

/// Get the current wall-clock time in milliseconds since the Unix epoch.
pub fn current_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| Timestamp::try_from(d.as_millis()).unwrap_or(Timestamp::MAX))
        .unwrap_or(0)
}

/// Registered capabilities and immutable settings.
///
/// Transitions read this while mutating the state.
pub(crate) struct Runtime<V: Validator> {
    pub(crate) config: ProtocolConfig,
    pub(crate) validator: V,
    pub(crate) handlers: HashMap<Address, Arc<dyn ResponseHandler>>,
    pub(crate) verifiers: HashMap<String, Arc<dyn ResponseVerifier>>,
    pub(crate) targets: HashMap<Address, Arc<dyn CallTarget>>,
}

/// The request gateway protocol.
///
/// `Protocol` is generic over the [`Validator`] so gateways can tighten or
/// relax input checks without touching the operation logic.
pub struct Protocol<V: Validator = DefaultValidator> {
    state: ProtocolState,
    pub(crate) runtime: Runtime<V>,
}

/// Protocol with the default validator.
pub type DefaultProtocol = Protocol<DefaultValidator>;

impl Protocol<DefaultValidator> {
    /// Create a protocol whose validator enforces the configured limits.
    ///
    /// # Arguments
    /// * `owner` - Initial holder of the owner role
    /// * `manager` - Account manager address, seeds account proxy addresses
    /// * `config` - Protocol configuration
    pub fn new(owner: Address, manager: Address, config: ProtocolConfig) -> Self {
        let validator = DefaultValidator::with_limits(config.request_limits());
        Self::with_validator(owner, manager, config, validator)
    }
}

impl<V: Validator> Protocol<V> {
    /// Create a protocol with a custom validator.
    pub fn with_validator(
        owner: Address,
        manager: Address,
        config: ProtocolConfig,
        validator: V,
    ) -> Self {
        let state = ProtocolState::new(owner, manager, config.fee_config(), current_timestamp());
        tracing::info!(%owner, %manager, "protocol initialized");
        Self {
            state,
            runtime: Runtime {
                config,
                validator,
                handlers: HashMap::new(),
                verifiers: HashMap::new(),
                targets: HashMap::new(),
            },
        }
    }

    /// Run a transition inside a state transaction.
    ///
    /// Changes are committed only if `op` succeeds. On error they are rolled
    /// back, so a failed transition leaves balances, nonces, records and
    /// events untouched. A transition that never finished is rolled back
    /// when the next one begins.
    pub(crate) fn transact<T, F>(&mut self, op: F) -> GatewayResult<T>
    where
        F: FnOnce(&mut ProtocolState, &Runtime<V>) -> GatewayResult<T>,
    {
        self.state.begin();
        match op(&mut self.state, &self.runtime) {
            Ok(output) => {
                self.state.commit();
                Ok(output)
            }
            Err(e) => {
                self.state.rollback();
                Err(e)
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current protocol state.
    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    /// Protocol configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.runtime.config
    }

    /// The validator in use.
    pub fn validator(&self) -> &V {
        &self.runtime.validator
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.state.owner
    }

    /// Issue an owner capability to `caller`.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the owner
    pub fn owner_cap(&self, caller: &Address) -> GatewayResult<OwnerCap> {
        if *caller != self.state.owner {
            return Err(GatewayError::Unauthorized(*caller));
        }
        Ok(OwnerCap::new(*caller))
    }

    /// Look up a request record.
    pub fn request(&self, request_id: &Hash) -> Option<RequestRecord> {
        self.state.requests.get(request_id)
    }

    /// Number of requests awaiting delivery.
    pub fn pending_requests(&self) -> usize {
        self.state.requests.pending_count()
    }

    /// Balance of `holder` in `token`.
    pub fn balance_of(&self, token: &Address, holder: &Address) -> Amount {
        self.state.ledger.balance_of(token, holder)
    }

    /// Direct access to the token ledger, for funding accounts and setting
    /// allowances outside protocol transitions.
    pub fn ledger_mut(&mut self) -> &mut MemoryLedger {
        &mut self.state.ledger
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Current protocol time in milliseconds.
    pub fn now(&self) -> Timestamp {
        self.state.now
    }

    /// Set the protocol clock.
    pub fn set_time(&mut self, now: Timestamp) {
        self.state.now = now;
    }

    /// Move the protocol clock forward.
    pub fn advance_time(&mut self, ms: u64) {
        self.state.now = self.state.now.saturating_add(ms);
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// All events emitted by committed transitions.
    pub fn events(&self) -> &[GatewayEvent] {
        self.state.events.events()
    }

    /// Export the event log as JSON.
    pub fn export_events_json(&self) -> Result<String, serde_json::Error> {
        self.state.events.to_json()
    }

    // =========================================================================
    // Capability Registration
    // =========================================================================

    /// Register the response handler of an account.
    pub fn register_handler(
        &mut self,
        cap: &OwnerCap,
        account: Address,
        handler: Arc<dyn ResponseHandler>,
    ) -> GatewayResult<()> {
        self.state.require_owner(cap)?;
        tracing::debug!(%account, "response handler registered");
        self.runtime.handlers.insert(account, handler);
        Ok(())
    }

    /// Register an external verifier under `name`.
    pub fn register_verifier(
        &mut self,
        cap: &OwnerCap,
        name: impl Into<String>,
        verifier: Arc<dyn ResponseVerifier>,
    ) -> GatewayResult<()> {
        self.state.require_owner(cap)?;
        let name = name.into();
        tracing::debug!(verifier = %name, "external verifier registered");
        self.runtime.verifiers.insert(name, verifier);
        Ok(())
    }

    /// Register a contract reachable through the forwarder.
    pub fn register_target(
        &mut self,
        cap: &OwnerCap,
        address: Address,
        target: Arc<dyn CallTarget>,
    ) -> GatewayResult<()> {
        self.state.require_owner(cap)?;
        tracing::debug!(target = %address, "call target registered");
        self.runtime.targets.insert(address, target);
        Ok(())
    }

    /// Whether an account has a registered response handler.
    pub fn has_handler(&self, account: &Address) -> bool {
        self.runtime.handlers.contains_key(account)
    }
}
