//! Mock implementation of the `ResponseHandler` trait for testing.
//!
//! Records every accepted response and charges a configurable amount of
//! gas per call.

use std::sync::{Arc, RwLock};

use tlsgate_crypto::Hash;
use tlsgate_econ::GasMeter;
use tlsgate_ops::{CallbackError, ResponseHandler};
use tlsgate_types::Gas;

/// A response the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledResponse {
    /// Delivered request id.
    pub request_id: Hash,
    /// Hash the request was bound to.
    pub request_hash: Hash,
    /// Response bytes.
    pub response: Vec<u8>,
    /// Gas left on the meter when the handler was called.
    pub gas_available: Gas,
}

struct MockResponseHandlerInner {
    /// Accepted responses in delivery order.
    handled: Vec<HandledResponse>,
    /// Gas charged per call.
    gas_per_call: Gas,
    /// When true, every call reverts.
    should_fail: bool,
}

/// A mock implementation of the `ResponseHandler` trait for testing.
///
/// Uses `Arc<RwLock<...>>` internally, so it is cheap to clone and all
/// clones share the same state. Keep a clone to make assertions after
/// handing one to the protocol.
#[derive(Clone)]
pub struct MockResponseHandler {
    inner: Arc<RwLock<MockResponseHandlerInner>>,
}

impl Default for MockResponseHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResponseHandler {
    /// Create a handler that accepts everything and charges 21,000 gas.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockResponseHandlerInner {
                handled: Vec::new(),
                gas_per_call: 21_000,
                should_fail: false,
            })),
        }
    }

    /// Set the gas charged per call.
    pub fn with_gas(self, gas: Gas) -> Self {
        self.inner.write().unwrap().gas_per_call = gas;
        self
    }

    /// Configure the handler to revert every call.
    pub fn with_failure(self) -> Self {
        self.inner.write().unwrap().should_fail = true;
        self
    }

    /// Set the failure mode at runtime.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.inner.write().unwrap().should_fail = should_fail;
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// All accepted responses.
    pub fn handled(&self) -> Vec<HandledResponse> {
        self.inner.read().unwrap().handled.clone()
    }

    /// Number of accepted responses.
    pub fn call_count(&self) -> usize {
        self.inner.read().unwrap().handled.len()
    }

    /// The most recently accepted response.
    pub fn last(&self) -> Option<HandledResponse> {
        self.inner.read().unwrap().handled.last().cloned()
    }

    /// Gas charged per call.
    pub fn gas_per_call(&self) -> Gas {
        self.inner.read().unwrap().gas_per_call
    }
}

impl ResponseHandler for MockResponseHandler {
    fn handle_response(
        &self,
        gas: &mut GasMeter,
        request_id: &Hash,
        request_hash: &Hash,
        response: &[u8],
    ) -> Result<(), CallbackError> {
        let mut inner = self.inner.write().unwrap();
        let gas_available = gas.remaining();
        gas.charge(inner.gas_per_call)?;
        if inner.should_fail {
            return Err(CallbackError::reverted("mock: configured to fail"));
        }
        inner.handled.push(HandledResponse {
            request_id: *request_id,
            request_hash: *request_hash,
            response: response.to_vec(),
            gas_available,
        });
        Ok(())
    }
}
