//! In-memory request store.

use tlsgate_crypto::{Address, Hash};
use tlsgate_types::{RequestRecord, RequestState};

use crate::error::{Result, StoreError};
use crate::journal::JournaledMap;
use crate::traits::{RequestStore, Transactional};

/// Request records and request nonces held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRequestStore {
    records: JournaledMap<Hash, RequestRecord>,
    nonces: JournaledMap<(Address, Address), u64>,
    pending: usize,
    saved_pending: Option<usize>,
}

impl MemoryRequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Transactional for MemoryRequestStore {
    fn begin(&mut self) {
        self.rollback();
        self.records.begin();
        self.nonces.begin();
        self.saved_pending = Some(self.pending);
    }

    fn commit(&mut self) {
        self.records.commit();
        self.nonces.commit();
        self.saved_pending = None;
    }

    fn rollback(&mut self) {
        self.records.rollback();
        self.nonces.rollback();
        if let Some(pending) = self.saved_pending.take() {
            self.pending = pending;
        }
    }
}

impl RequestStore for MemoryRequestStore {
    fn insert(&mut self, record: RequestRecord) -> Result<()> {
        if self.records.contains_key(&record.request_id) {
            return Err(StoreError::DuplicateRequest(record.request_id));
        }
        if record.is_pending() {
            self.pending += 1;
        }
        self.records.insert(record.request_id, record);
        Ok(())
    }

    fn get(&self, request_id: &Hash) -> Option<RequestRecord> {
        self.records.get(request_id).cloned()
    }

    fn set_state(&mut self, request_id: &Hash, state: RequestState) -> Result<()> {
        let record = self
            .records
            .get_mut(request_id)
            .ok_or(StoreError::RequestNotFound(*request_id))?;
        let was_pending = record.is_pending();
        record.state = state;
        match (was_pending, record.is_pending()) {
            (true, false) => self.pending -= 1,
            (false, true) => self.pending += 1,
            _ => {}
        }
        Ok(())
    }

    fn next_nonce(&self, gateway: &Address, account: &Address) -> u64 {
        self.nonces
            .get(&(*gateway, *account))
            .copied()
            .unwrap_or(0)
    }

    fn consume_nonce(&mut self, gateway: &Address, account: &Address) -> Result<u64> {
        let current = self.next_nonce(gateway, account);
        let next = current.checked_add(1).ok_or(StoreError::Overflow)?;
        self.nonces.insert((*gateway, *account), next);
        Ok(current)
    }

    fn pending_count(&self) -> usize {
        self.pending
    }
}
