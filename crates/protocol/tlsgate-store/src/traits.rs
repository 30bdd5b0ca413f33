//! Trait definitions for storage components.
//!
//! This module defines the contracts for all protocol state. The
//! orchestration layer only talks to state through these traits.

use tlsgate_crypto::{Address, Hash};
use tlsgate_types::{
    Amount, AuthorizedAccount, GatewayId, ProverEntry, ProverId, RequestRecord, RequestState,
};

use crate::error::Result;

// =============================================================================
// Transactions
// =============================================================================

/// State that can undo every change made since [`begin`](Self::begin).
///
/// Changes made outside a transaction are permanent.
pub trait Transactional {
    /// Start recording changes. An unfinished transaction is rolled back
    /// first.
    fn begin(&mut self);

    /// Keep every change made since `begin` and stop recording.
    fn commit(&mut self);

    /// Undo every change made since `begin` and stop recording.
    fn rollback(&mut self);
}

// =============================================================================
// Token Ledger
// =============================================================================

/// A multi-token fungible ledger.
///
/// Every call names the token, so one ledger can hold the payment token and
/// any number of other tokens.
pub trait TokenLedger {
    /// Balance of `holder` in `token`.
    fn balance_of(&self, token: &Address, holder: &Address) -> Amount;

    /// Total minted supply of `token`.
    fn total_supply(&self, token: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// Fails with `InsufficientBalance` without changing any balance.
    fn transfer(&mut self, token: &Address, from: &Address, to: &Address, amount: Amount)
        -> Result<()>;

    /// Set the allowance `spender` may move on behalf of `owner`.
    fn approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: Amount);

    /// Current allowance.
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Create `amount` new tokens for `to`.
    fn mint(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<()>;
}

// =============================================================================
// Account Registry
// =============================================================================

/// Account proxies, gateway ids and the account beacon.
///
/// `check_access` is the only authorization predicate in the protocol.
pub trait AccountStore {
    /// Look up an account proxy.
    fn get_account(&self, account: &Address) -> Option<AuthorizedAccount>;

    /// Insert or replace an account proxy.
    fn put_account(&mut self, account: AuthorizedAccount);

    /// Enable or disable an account. Unknown accounts are recorded unbound.
    fn set_enabled(&mut self, account: &Address, enabled: bool);

    /// Whether `account` is enabled and bound to `gateway`.
    fn check_access(&self, account: &Address, gateway: &Address) -> bool;

    /// Register a gateway under an id, replacing any previous gateway.
    fn set_gateway(&mut self, gateway_id: GatewayId, gateway: Address);

    /// Gateway registered under an id.
    fn gateway(&self, gateway_id: GatewayId) -> Option<Address>;

    /// Whether the address is a registered gateway.
    fn is_gateway(&self, gateway: &Address) -> bool;

    /// Set the account beacon.
    fn set_beacon(&mut self, beacon: Address);

    /// The account beacon, if configured.
    fn beacon(&self) -> Option<Address>;

    /// Take the next account creation index.
    fn next_account_index(&mut self) -> Result<u64>;
}

// =============================================================================
// Prover Registry
// =============================================================================

/// Registered provers and their in-flight counts.
pub trait ProverStore {
    /// Look up a prover.
    fn get_prover(&self, prover_id: &ProverId) -> Option<ProverEntry>;

    /// Insert or replace a prover. The in-flight count of an existing entry
    /// is carried over.
    fn put_prover(&mut self, entry: ProverEntry);

    /// Record a new in-flight request against a prover.
    fn acquire(&mut self, prover_id: &ProverId) -> Result<()>;

    /// Release an in-flight request.
    fn release(&mut self, prover_id: &ProverId) -> Result<()>;

    /// All registered provers.
    fn list_provers(&self) -> Vec<ProverEntry>;
}

// =============================================================================
// Request Store
// =============================================================================

/// Request records and per-(gateway, account) request nonces.
pub trait RequestStore {
    /// Store a new record. Fails on duplicate id.
    fn insert(&mut self, record: RequestRecord) -> Result<()>;

    /// Look up a record.
    fn get(&self, request_id: &Hash) -> Option<RequestRecord>;

    /// Move a record to a new state.
    fn set_state(&mut self, request_id: &Hash, state: RequestState) -> Result<()>;

    /// The nonce the next request from `account` to `gateway` will use.
    fn next_nonce(&self, gateway: &Address, account: &Address) -> u64;

    /// Consume the current nonce and return it.
    fn consume_nonce(&mut self, gateway: &Address, account: &Address) -> Result<u64>;

    /// Number of records still awaiting delivery.
    fn pending_count(&self) -> usize;
}

// =============================================================================
// Forwarder Nonces
// =============================================================================

/// Forwarder nonces per signer.
pub trait NonceStore {
    /// The next nonce expected from `from`.
    fn nonce_of(&self, from: &Address) -> u64;

    /// Consume the current nonce and return it.
    fn consume(&mut self, from: &Address) -> Result<u64>;
}
