//! In-memory forwarder nonce tracker.

use tlsgate_crypto::Address;

use crate::error::{Result, StoreError};
use crate::journal::JournaledMap;
use crate::traits::{NonceStore, Transactional};

/// Forwarder nonces held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNonceTracker {
    nonces: JournaledMap<Address, u64>,
}

impl MemoryNonceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transactional for MemoryNonceTracker {
    fn begin(&mut self) {
        self.nonces.begin();
    }

    fn commit(&mut self) {
        self.nonces.commit();
    }

    fn rollback(&mut self) {
        self.nonces.rollback();
    }
}

impl NonceStore for MemoryNonceTracker {
    fn nonce_of(&self, from: &Address) -> u64 {
        self.nonces.get(from).copied().unwrap_or(0)
    }

    fn consume(&mut self, from: &Address) -> Result<u64> {
        let current = self.nonce_of(from);
        let next = current.checked_add(1).ok_or(StoreError::Overflow)?;
        self.nonces.insert(*from, next);
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume() {
        let mut tracker = MemoryNonceTracker::new();
        let from = Address([1u8; 20]);
        assert_eq!(tracker.nonce_of(&from), 0);
        assert_eq!(tracker.consume(&from).unwrap(), 0);
        assert_eq!(tracker.nonce_of(&from), 1);
        assert_eq!(tracker.nonce_of(&Address([2u8; 20])), 0);
    }

    #[test]
    fn test_rollback_unconsumes() {
        let mut tracker = MemoryNonceTracker::new();
        let from = Address([1u8; 20]);
        tracker.consume(&from).unwrap();

        tracker.begin();
        tracker.consume(&from).unwrap();
        tracker.rollback();
        assert_eq!(tracker.nonce_of(&from), 1);
    }
}
