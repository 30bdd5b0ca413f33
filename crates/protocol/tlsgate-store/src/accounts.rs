//! In-memory account registry.

use tlsgate_crypto::{Address, ZERO_ADDRESS};
use tlsgate_types::{AuthorizedAccount, GatewayId};

use crate::error::{Result, StoreError};
use crate::journal::JournaledMap;
use crate::traits::{AccountStore, Transactional};

/// Account proxies, gateway ids and the beacon held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountRegistry {
    accounts: JournaledMap<Address, AuthorizedAccount>,
    gateways: JournaledMap<GatewayId, Address>,
    beacon: Option<Address>,
    created: u64,
    /// Beacon and account counter as of `begin`.
    saved: Option<(Option<Address>, u64)>,
}

impl MemoryAccountRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl Transactional for MemoryAccountRegistry {
    fn begin(&mut self) {
        self.rollback();
        self.accounts.begin();
        self.gateways.begin();
        self.saved = Some((self.beacon, self.created));
    }

    fn commit(&mut self) {
        self.accounts.commit();
        self.gateways.commit();
        self.saved = None;
    }

    fn rollback(&mut self) {
        self.accounts.rollback();
        self.gateways.rollback();
        if let Some((beacon, created)) = self.saved.take() {
            self.beacon = beacon;
            self.created = created;
        }
    }
}

impl AccountStore for MemoryAccountRegistry {
    fn get_account(&self, account: &Address) -> Option<AuthorizedAccount> {
        self.accounts.get(account).copied()
    }

    fn put_account(&mut self, account: AuthorizedAccount) {
        self.accounts.insert(account.account, account);
    }

    fn set_enabled(&mut self, account: &Address, enabled: bool) {
        let entry = match self.accounts.get(account) {
            Some(existing) => AuthorizedAccount {
                enabled,
                ..*existing
            },
            None => AuthorizedAccount {
                account: *account,
                gateway: ZERO_ADDRESS,
                enabled,
            },
        };
        self.accounts.insert(*account, entry);
    }

    fn check_access(&self, account: &Address, gateway: &Address) -> bool {
        self.accounts
            .get(account)
            .is_some_and(|entry| entry.allows(gateway))
    }

    fn set_gateway(&mut self, gateway_id: GatewayId, gateway: Address) {
        self.gateways.insert(gateway_id, gateway);
    }

    fn gateway(&self, gateway_id: GatewayId) -> Option<Address> {
        self.gateways.get(&gateway_id).copied()
    }

    fn is_gateway(&self, gateway: &Address) -> bool {
        !gateway.is_zero() && self.gateways.values().any(|g| g == gateway)
    }

    fn set_beacon(&mut self, beacon: Address) {
        self.beacon = Some(beacon);
    }

    fn beacon(&self) -> Option<Address> {
        self.beacon
    }

    fn next_account_index(&mut self) -> Result<u64> {
        let index = self.created;
        self.created = index.checked_add(1).ok_or(StoreError::Overflow)?;
        Ok(index)
    }
}
