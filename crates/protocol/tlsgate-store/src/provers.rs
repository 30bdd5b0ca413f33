//! In-memory prover registry.

use tlsgate_types::{ProverEntry, ProverId};

use crate::error::{Result, StoreError};
use crate::journal::JournaledMap;
use crate::traits::{ProverStore, Transactional};

/// Prover entries held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProverRegistry {
    provers: JournaledMap<ProverId, ProverEntry>,
}

impl MemoryProverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transactional for MemoryProverRegistry {
    fn begin(&mut self) {
        self.provers.begin();
    }

    fn commit(&mut self) {
        self.provers.commit();
    }

    fn rollback(&mut self) {
        self.provers.rollback();
    }
}

impl ProverStore for MemoryProverRegistry {
    fn get_prover(&self, prover_id: &ProverId) -> Option<ProverEntry> {
        self.provers.get(prover_id).cloned()
    }

    fn put_prover(&mut self, mut entry: ProverEntry) {
        if let Some(existing) = self.provers.get(&entry.prover_id) {
            entry.in_flight = existing.in_flight;
        }
        self.provers.insert(entry.prover_id, entry);
    }

    fn acquire(&mut self, prover_id: &ProverId) -> Result<()> {
        let entry = self
            .provers
            .get_mut(prover_id)
            .ok_or(StoreError::ProverNotFound(*prover_id))?;
        entry.in_flight = entry.in_flight.checked_add(1).ok_or(StoreError::Overflow)?;
        Ok(())
    }

    fn release(&mut self, prover_id: &ProverId) -> Result<()> {
        let entry = self
            .provers
            .get_mut(prover_id)
            .ok_or(StoreError::ProverNotFound(*prover_id))?;
        entry.in_flight = entry.in_flight.saturating_sub(1);
        Ok(())
    }

    fn list_provers(&self) -> Vec<ProverEntry> {
        let mut provers: Vec<ProverEntry> = self.provers.values().cloned().collect();
        provers.sort_by(|a, b| a.prover_id.cmp(&b.prover_id));
        provers
    }
}
