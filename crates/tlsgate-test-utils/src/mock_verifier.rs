//! Mock implementation of the `ResponseVerifier` trait for testing.

use std::sync::{Arc, RwLock};

use tlsgate_crypto::Hash;
use tlsgate_ops::ResponseVerifier;

struct MockVerifierInner {
    /// Verdict returned for every proof.
    accept: bool,
    /// Number of proofs checked.
    calls: usize,
}

/// A verifier with a fixed verdict that counts its calls.
#[derive(Clone)]
pub struct MockVerifier {
    inner: Arc<RwLock<MockVerifierInner>>,
}

impl MockVerifier {
    /// A verifier accepting every proof.
    pub fn accepting() -> Self {
        Self::with_verdict(true)
    }

    /// A verifier rejecting every proof.
    pub fn rejecting() -> Self {
        Self::with_verdict(false)
    }

    fn with_verdict(accept: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockVerifierInner { accept, calls: 0 })),
        }
    }

    /// Change the verdict at runtime.
    pub fn set_accept(&self, accept: bool) {
        self.inner.write().unwrap().accept = accept;
    }

    /// Number of proofs checked so far.
    pub fn call_count(&self) -> usize {
        self.inner.read().unwrap().calls
    }
}

impl ResponseVerifier for MockVerifier {
    fn verify(&self, _: &Hash, _: &[u8], _: &[u8], _: &[u8]) -> bool {
        let mut inner = self.inner.write().unwrap();
        inner.calls += 1;
        inner.accept
    }
}
