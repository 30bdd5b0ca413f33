//! In-memory token ledger.

use tlsgate_crypto::Address;
use tlsgate_types::Amount;

use crate::error::{Result, StoreError};
use crate::journal::JournaledMap;
use crate::traits::{TokenLedger, Transactional};

/// A map-backed multi-token ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: JournaledMap<(Address, Address), Amount>,
    allowances: JournaledMap<(Address, Address, Address), Amount>,
    supply: JournaledMap<Address, Amount>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn debit(&mut self, token: &Address, holder: &Address, amount: Amount) -> Result<()> {
        let balance = self.balance_of(token, holder);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(StoreError::InsufficientBalance {
                token: *token,
                holder: *holder,
                balance,
                needed: amount,
            })?;
        self.balances.insert((*token, *holder), remaining);
        Ok(())
    }

    fn credit(&mut self, token: &Address, holder: &Address, amount: Amount) -> Result<()> {
        let balance = self.balance_of(token, holder);
        let updated = balance.checked_add(amount).ok_or(StoreError::Overflow)?;
        self.balances.insert((*token, *holder), updated);
        Ok(())
    }
}

impl Transactional for MemoryLedger {
    fn begin(&mut self) {
        self.balances.begin();
        self.allowances.begin();
        self.supply.begin();
    }

    fn commit(&mut self) {
        self.balances.commit();
        self.allowances.commit();
        self.supply.commit();
    }

    fn rollback(&mut self) {
        self.balances.rollback();
        self.allowances.rollback();
        self.supply.rollback();
    }
}

impl TokenLedger for MemoryLedger {
    fn balance_of(&self, token: &Address, holder: &Address) -> Amount {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    fn total_supply(&self, token: &Address) -> Amount {
        self.supply.get(token).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        if from == to {
            // Self-transfers still require the balance.
            let balance = self.balance_of(token, from);
            if balance < amount {
                return Err(StoreError::InsufficientBalance {
                    token: *token,
                    holder: *from,
                    balance,
                    needed: amount,
                });
            }
            return Ok(());
        }
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }

    fn approve(&mut self, token: &Address, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances.insert((*token, *owner, *spender), amount);
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let allowance = self.allowance(token, from, spender);
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(StoreError::InsufficientAllowance {
                token: *token,
                owner: *from,
                spender: *spender,
                allowance,
                needed: amount,
            })?;
        self.transfer(token, from, to, amount)?;
        self.allowances.insert((*token, *from, *spender), remaining);
        Ok(())
    }

    fn mint(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<()> {
        let supply = self
            .total_supply(token)
            .checked_add(amount)
            .ok_or(StoreError::Overflow)?;
        self.credit(token, to, amount)?;
        self.supply.insert(*token, supply);
        tracing::trace!(token = %token, to = %to, amount, "minted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address([0xee; 20]);
    const ALICE: Address = Address([1u8; 20]);
    const BOB: Address = Address([2u8; 20]);
    const CAROL: Address = Address([3u8; 20]);

    fn funded() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&TOKEN, &ALICE, 100).unwrap();
        ledger
    }

    #[test]
    fn test_mint_and_supply() {
        let ledger = funded();
        assert_eq!(ledger.balance_of(&TOKEN, &ALICE), 100);
        assert_eq!(ledger.total_supply(&TOKEN), 100);
        assert_eq!(ledger.balance_of(&Address([9u8; 20]), &ALICE), 0);
    }

    #[test]
    fn test_transfer() {
        let mut ledger = funded();
        ledger.transfer(&TOKEN, &ALICE, &BOB, 30).unwrap();
        assert_eq!(ledger.balance_of(&TOKEN, &ALICE), 70);
        assert_eq!(ledger.balance_of(&TOKEN, &BOB), 30);
    }

    #[test]
    fn test_transfer_insufficient_leaves_balances() {
        let mut ledger = funded();
        let result = ledger.transfer(&TOKEN, &ALICE, &BOB, 101);
        assert_eq!(
            result,
            Err(StoreError::InsufficientBalance {
                token: TOKEN,
                holder: ALICE,
                balance: 100,
                needed: 101
            })
        );
        assert_eq!(ledger.balance_of(&TOKEN, &ALICE), 100);
        assert_eq!(ledger.balance_of(&TOKEN, &BOB), 0);
    }

    #[test]
    fn test_self_transfer_requires_balance() {
        let mut ledger = funded();
        assert!(ledger.transfer(&TOKEN, &ALICE, &ALICE, 100).is_ok());
        assert!(ledger.transfer(&TOKEN, &ALICE, &ALICE, 101).is_err());
        assert_eq!(ledger.balance_of(&TOKEN, &ALICE), 100);
    }

    #[test]
    fn test_transfer_from_uses_allowance() {
        let mut ledger = funded();
        ledger.approve(&TOKEN, &ALICE, &BOB, 50);

        ledger.transfer_from(&TOKEN, &BOB, &ALICE, &CAROL, 20).unwrap();
        assert_eq!(ledger.allowance(&TOKEN, &ALICE, &BOB), 30);
        assert_eq!(ledger.balance_of(&TOKEN, &CAROL), 20);

        assert!(matches!(
            ledger.transfer_from(&TOKEN, &BOB, &ALICE, &CAROL, 31),
            Err(StoreError::InsufficientAllowance { .. })
        ));
        assert_eq!(ledger.allowance(&TOKEN, &ALICE, &BOB), 30);
    }

    #[test]
    fn test_transfer_from_balance_failure_keeps_allowance() {
        let mut ledger = funded();
        ledger.approve(&TOKEN, &ALICE, &BOB, 500);
        assert!(matches!(
            ledger.transfer_from(&TOKEN, &BOB, &ALICE, &CAROL, 200),
            Err(StoreError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.allowance(&TOKEN, &ALICE, &BOB), 500);
    }

    #[test]
    fn test_rollback_restores_balances_and_allowances() {
        let mut ledger = funded();
        ledger.approve(&TOKEN, &ALICE, &BOB, 50);

        ledger.begin();
        ledger.transfer_from(&TOKEN, &BOB, &ALICE, &CAROL, 20).unwrap();
        ledger.mint(&TOKEN, &BOB, 5).unwrap();
        ledger.rollback();

        assert_eq!(ledger.balance_of(&TOKEN, &ALICE), 100);
        assert_eq!(ledger.balance_of(&TOKEN, &CAROL), 0);
        assert_eq!(ledger.balance_of(&TOKEN, &BOB), 0);
        assert_eq!(ledger.allowance(&TOKEN, &ALICE, &BOB), 50);
        assert_eq!(ledger.total_supply(&TOKEN), 100);
    }

    #[test]
    fn test_mint_overflow() {
        let mut ledger = funded();
        assert_eq!(
            ledger.mint(&TOKEN, &BOB, Amount::MAX),
            Err(StoreError::Overflow)
        );
        assert_eq!(ledger.balance_of(&TOKEN, &BOB), 0);
    }
}
