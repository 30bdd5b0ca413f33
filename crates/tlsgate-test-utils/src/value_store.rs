//! A forwarder-aware call target for testing.
//!
//! `ValueStore` trusts the forwarder: it takes the last 20 bytes of its
//! calldata as the original sender and stores one value per sender.
//!
//! Supported calls:
//! - `setValue(uint256)` stores the value for the sender
//! - `getValue()` returns the sender's value as a 32-byte word

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall, SolValue};
use tlsgate_crypto::Address;
use tlsgate_econ::GasMeter;
use tlsgate_ops::{CallContext, CallError, CallTarget};
use tlsgate_types::Gas;

/// Gas charged for a store.
pub const STORE_GAS: Gas = 20_000;

/// Gas charged for a load.
pub const LOAD_GAS: Gas = 2_100;

sol! {
    interface IValueStore {
        function setValue(uint256 value) external;
        function getValue() external view returns (uint256);
    }
}

/// Per-sender value storage reachable through the forwarder.
#[derive(Clone, Default)]
pub struct ValueStore {
    values: Arc<RwLock<HashMap<Address, u128>>>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored for `sender`.
    pub fn value_of(&self, sender: &Address) -> Option<u128> {
        self.values.read().unwrap().get(sender).copied()
    }

    /// Calldata for `setValue(value)`.
    pub fn set_value_calldata(value: u128) -> Vec<u8> {
        IValueStore::setValueCall {
            value: U256::from(value),
        }
        .abi_encode()
    }

    /// Calldata for `getValue()`.
    pub fn get_value_calldata() -> Vec<u8> {
        IValueStore::getValueCall {}.abi_encode()
    }

    /// Return data of `getValue()` for `value`.
    pub fn value_return_data(value: u128) -> Vec<u8> {
        U256::from(value).abi_encode()
    }
}

fn bad_calldata(err: impl std::fmt::Display) -> CallError {
    CallError::BadCalldata(err.to_string())
}

/// Split `data || sender` into its parts.
fn split_sender(calldata: &[u8]) -> Result<(&[u8], Address), CallError> {
    if calldata.len() < 20 {
        return Err(CallError::BadCalldata("missing sender suffix".to_string()));
    }
    let (data, suffix) = calldata.split_at(calldata.len() - 20);
    let mut sender = [0u8; 20];
    sender.copy_from_slice(suffix);
    Ok((data, Address(sender)))
}

impl CallTarget for ValueStore {
    fn call(
        &self,
        _ctx: &CallContext,
        gas: &mut GasMeter,
        calldata: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        let (data, sender) = split_sender(calldata)?;
        let selector = data
            .get(..4)
            .ok_or_else(|| bad_calldata("missing selector"))?;

        if selector == IValueStore::setValueCall::SELECTOR {
            let call = IValueStore::setValueCall::abi_decode(data, true).map_err(bad_calldata)?;
            let value = u128::try_from(call.value).map_err(bad_calldata)?;
            gas.charge(STORE_GAS)?;
            self.values.write().unwrap().insert(sender, value);
            Ok(Vec::new())
        } else if selector == IValueStore::getValueCall::SELECTOR {
            gas.charge(LOAD_GAS)?;
            let value = self.value_of(&sender).unwrap_or(0);
            Ok(Self::value_return_data(value))
        } else {
            Err(CallError::Reverted(format!(
                "unknown selector 0x{}",
                selector.iter().map(|b| format!("{:02x}", b)).collect::<String>()
            )))
        }
    }
}
