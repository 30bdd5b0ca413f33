//! Request identifier derivation.
//!
//! Request ids and request hashes are pure functions of their inputs and
//! can be recomputed off-chain with `tlsgate_wire`. The hash binding a
//! request uses is chosen from configuration at submission time and stored
//! in the record.

use tlsgate_crypto::{Address, Hash};
use tlsgate_store::RequestStore;
use tlsgate_types::{RequestHashBinding, SubmitRequest, TemplatedRequest};
use tlsgate_valid::Validator;

use crate::protocol::Protocol;

/// Compute the request id for a `(gateway, account, nonce)` triple.
pub fn compute_request_id(gateway: &Address, account: &Address, nonce: u64) -> Hash {
    tlsgate_wire::request_id(gateway, account, nonce)
}

/// Compute the template-bound request hash.
pub fn compute_request_hash(
    remote: &str,
    server_name: &str,
    encrypted_key: &[u8],
    template: &TemplatedRequest,
) -> Hash {
    tlsgate_wire::template_request_hash(remote, server_name, encrypted_key, template)
}

/// Compute the compact request hash.
pub fn compute_request_hash_compact(
    request_id: &Hash,
    sender: &Address,
    encrypted_key: &[u8],
    nonce: u64,
) -> Hash {
    tlsgate_wire::compact_request_hash(request_id, sender, encrypted_key, nonce)
}

/// Compute the hash a submission is bound to under `binding`.
pub fn bind_request_hash(
    binding: RequestHashBinding,
    request_id: &Hash,
    requester: &Address,
    nonce: u64,
    submit: &SubmitRequest,
) -> Hash {
    let hash = match binding {
        RequestHashBinding::Template => compute_request_hash(
            &submit.remote,
            &submit.server_name,
            &submit.encrypted_key,
            &submit.template,
        ),
        RequestHashBinding::Compact => {
            compute_request_hash_compact(request_id, requester, &submit.encrypted_key, nonce)
        }
    };
    tracing::debug!(%request_id, ?binding, request_hash = %hash, "request hash derived");
    hash
}

impl<V: Validator> Protocol<V> {
    /// The id the next submission by `account` through `gateway` will get.
    pub fn predict_request_id(&self, gateway: &Address, account: &Address) -> Hash {
        let nonce = self.state().requests.next_nonce(gateway, account);
        compute_request_id(gateway, account, nonce)
    }

    /// The next request nonce of `account` at `gateway`.
    pub fn request_nonce(&self, gateway: &Address, account: &Address) -> u64 {
        self.state().requests.next_nonce(gateway, account)
    }
}
