//! In-memory state stores for the tlsgate protocol.
//!
//! This crate holds all protocol state:
//!
//! - **Token ledger**: multi-token balances and allowances
//! - **Account registry**: account proxies, gateway ids and the account beacon
//! - **Prover registry**: prover entries with in-flight request counts
//! - **Request store**: request records and per-(gateway, account) nonces
//! - **Nonce tracker**: forwarder nonces per signer
//! - **Event log**: the ordered list of emitted events
//!
//! # Trait-Based Design
//!
//! Every store is defined as a trait with an in-memory implementation. The
//! in-memory stores also implement [`Transactional`]: between `begin` and
//! `commit` they journal the prior value of every entry they change, so the
//! orchestration layer can roll a failed transition back without copying
//! the state.
//!
//! # Example
//!
//! ```
//! use tlsgate_store::{MemoryLedger, TokenLedger};
//! use tlsgate_crypto::Address;
//!
//! let token = Address([1u8; 20]);
//! let alice = Address([2u8; 20]);
//! let bob = Address([3u8; 20]);
//!
//! let mut ledger = MemoryLedger::new();
//! ledger.mint(&token, &alice, 100).unwrap();
//! ledger.transfer(&token, &alice, &bob, 40).unwrap();
//!
//! assert_eq!(ledger.balance_of(&token, &alice), 60);
//! assert_eq!(ledger.balance_of(&token, &bob), 40);
//! ```

pub mod accounts;
pub mod error;
pub mod events;
pub mod journal;
pub mod ledger;
pub mod nonces;
pub mod provers;
pub mod requests;
pub mod traits;

pub use accounts::MemoryAccountRegistry;
pub use error::{Result, StoreError};
pub use events::EventLog;
pub use journal::JournaledMap;
pub use ledger::MemoryLedger;
pub use nonces::MemoryNonceTracker;
pub use provers::MemoryProverRegistry;
pub use requests::MemoryRequestStore;
pub use traits::{
    AccountStore, NonceStore, ProverStore, RequestStore, TokenLedger, Transactional,
};
