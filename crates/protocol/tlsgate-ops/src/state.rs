//! Protocol state and the owner capability.

use tlsgate_crypto::{Address, Timestamp};
use tlsgate_econ::FeeMeter;
use tlsgate_store::{
    EventLog, MemoryAccountRegistry, MemoryLedger, MemoryNonceTracker, MemoryProverRegistry,
    MemoryRequestStore, Transactional,
};
use tlsgate_types::FeeConfig;

use crate::error::{GatewayError, GatewayResult};

/// Everything a protocol transition may change.
///
/// Transitions run inside a transaction: the stores journal the entries they
/// touch and the scalar fields are saved at `begin`, so a failed transition
/// is undone in time proportional to what it changed.
#[derive(Debug, Clone)]
pub struct ProtocolState {
    /// Holder of the owner role.
    pub owner: Address,
    /// Address of the account manager; seeds account proxy addresses.
    pub manager: Address,
    /// Fee rate and payment token.
    pub fees: FeeMeter,
    /// Token balances and allowances.
    pub ledger: MemoryLedger,
    /// Account proxies, gateway ids and the account beacon.
    pub accounts: MemoryAccountRegistry,
    /// Registered provers.
    pub provers: MemoryProverRegistry,
    /// Request records and per-(gateway, account) nonces.
    pub requests: MemoryRequestStore,
    /// Per-signer forwarder nonces.
    pub forwarder_nonces: MemoryNonceTracker,
    /// Events emitted by committed transitions.
    pub events: EventLog,
    /// Current time in milliseconds.
    pub now: Timestamp,
    saved: Option<Scalars>,
}

/// Scalar fields as of `begin`.
#[derive(Debug, Clone, Copy)]
struct Scalars {
    owner: Address,
    manager: Address,
    fees: FeeMeter,
    now: Timestamp,
}

impl ProtocolState {
    /// Create an empty state.
    pub fn new(owner: Address, manager: Address, fees: FeeConfig, now: Timestamp) -> Self {
        Self {
            owner,
            manager,
            fees: FeeMeter::new(fees),
            ledger: MemoryLedger::new(),
            accounts: MemoryAccountRegistry::new(),
            provers: MemoryProverRegistry::new(),
            requests: MemoryRequestStore::new(),
            forwarder_nonces: MemoryNonceTracker::new(),
            events: EventLog::new(),
            now,
            saved: None,
        }
    }

    /// Check that `cap` still names the current owner.
    pub(crate) fn require_owner(&self, cap: &OwnerCap) -> GatewayResult<()> {
        if cap.holder != self.owner {
            return Err(GatewayError::Unauthorized(cap.holder));
        }
        Ok(())
    }
}

impl Transactional for ProtocolState {
    fn begin(&mut self) {
        self.rollback();
        self.ledger.begin();
        self.accounts.begin();
        self.provers.begin();
        self.requests.begin();
        self.forwarder_nonces.begin();
        self.events.begin();
        self.saved = Some(Scalars {
            owner: self.owner,
            manager: self.manager,
            fees: self.fees,
            now: self.now,
        });
    }

    fn commit(&mut self) {
        self.ledger.commit();
        self.accounts.commit();
        self.provers.commit();
        self.requests.commit();
        self.forwarder_nonces.commit();
        self.events.commit();
        self.saved = None;
    }

    fn rollback(&mut self) {
        self.ledger.rollback();
        self.accounts.rollback();
        self.provers.rollback();
        self.requests.rollback();
        self.forwarder_nonces.rollback();
        self.events.rollback();
        if let Some(saved) = self.saved.take() {
            self.owner = saved.owner;
            self.manager = saved.manager;
            self.fees = saved.fees;
            self.now = saved.now;
        }
    }
}

/// Proof that the caller held the owner role when the capability was issued.
///
/// Obtained from [`Protocol::owner_cap`](crate::Protocol::owner_cap). A
/// capability stops working once ownership moves to another address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerCap {
    holder: Address,
}

impl OwnerCap {
    pub(crate) fn new(holder: Address) -> Self {
        Self { holder }
    }

    /// Address the capability was issued to.
    pub fn holder(&self) -> Address {
        self.holder
    }
}
