//! Fee metering and gas accounting for tlsgate.
//!
//! This crate implements the protocol's economics as pure functions:
//!
//! - **Fee estimation**: `(request_bytes + max_response_bytes) * token_wei_per_byte`
//!   with checked arithmetic; overflow fails closed
//! - **Fee meter**: the owner-controlled fee configuration and its setters
//! - **Gas metering**: a bounded gas meter handed to callbacks and forwarded
//!   calls, plus the callback gas estimate used before submission
//!
//! # Example
//!
//! ```
//! use tlsgate_econ::{estimate_fee, request_bytes};
//!
//! let values = vec![vec![0u8; 32], vec![0u8; 32], vec![0u8; 32]];
//! let bytes = request_bytes(&values).unwrap();
//! let fee = estimate_fee(bytes, 10 * 1024, 1_000_000_000).unwrap();
//!
//! assert_eq!(fee, (96 + 10_240) * 1_000_000_000);
//! ```

pub mod error;
pub mod fee;
pub mod gas;

pub use error::{EconError, EconResult};
pub use fee::{estimate_fee, fee_for_bytes_per_token, request_bytes, require_fee, FeeMeter};
pub use gas::{estimate_callback_gas, GasMeter};
