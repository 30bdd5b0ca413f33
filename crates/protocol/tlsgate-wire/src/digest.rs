//! Identifier and digest computation.
//!
//! Every function here is a pure Keccak-256 over an ABI encoding with a
//! fixed field order and width, so the same values can be recomputed
//! off-chain with any ABI library:
//!
//! ```text
//! request_id      = keccak256(encodePacked(address gateway, address account, uint256 nonce))
//! template hash   = keccak256(encode(string remote, string server_name, bytes encrypted_key,
//!                                    bytes32 request_template_hash, uint64[] fields, bytes[] values))
//! compact hash    = keccak256(encode(bytes32 request_id, address requester,
//!                                    bytes encrypted_key, uint256 nonce))
//! forward digest  = keccak256(encode(address from, address to, uint256 value,
//!                                    uint256 gas, uint256 nonce, bytes data))
//! attestation     = keccak256(request_hash || keccak256(response))
//! account address = keccak256(encodePacked(address manager, uint256 gateway_id, uint256 index))[12:]
//! ```

use alloy_primitives::{keccak256, U256};
use alloy_sol_types::SolValue;
use tlsgate_crypto::{Address, Hash};
use tlsgate_types::{ForwardRequest, TemplatedRequest};

use crate::abi::{from_sol_hash, sol_address, sol_bytes, sol_hash};

fn digest(encoded: &[u8]) -> Hash {
    from_sol_hash(keccak256(encoded))
}

/// Compute a request id.
///
/// # Example
/// ```
/// use tlsgate_crypto::Address;
/// use tlsgate_wire::request_id;
///
/// let gateway = Address([1u8; 20]);
/// let account = Address([2u8; 20]);
/// assert_eq!(request_id(&gateway, &account, 0), request_id(&gateway, &account, 0));
/// assert_ne!(request_id(&gateway, &account, 0), request_id(&gateway, &account, 1));
/// ```
pub fn request_id(gateway: &Address, account: &Address, nonce: u64) -> Hash {
    let packed = (sol_address(gateway), sol_address(account), U256::from(nonce)).abi_encode_packed();
    digest(&packed)
}

/// Compute the template-bound request hash.
pub fn template_request_hash(
    remote: &str,
    server_name: &str,
    encrypted_key: &[u8],
    template: &TemplatedRequest,
) -> Hash {
    let values: Vec<_> = template.values.iter().map(|value| sol_bytes(value)).collect();

    let encoded = (
        remote.to_string(),
        server_name.to_string(),
        sol_bytes(encrypted_key),
        sol_hash(&template.request_template_hash),
        template.fields.clone(),
        values,
    )
        .abi_encode_params();
    digest(&encoded)
}

/// Compute the compact request hash.
pub fn compact_request_hash(
    request_id: &Hash,
    requester: &Address,
    encrypted_key: &[u8],
    nonce: u64,
) -> Hash {
    let encoded = (
        sol_hash(request_id),
        sol_address(requester),
        sol_bytes(encrypted_key),
        U256::from(nonce),
    )
        .abi_encode_params();
    digest(&encoded)
}

/// Compute the digest a forward request signer signs (before the
/// personal-message prefix is applied).
pub fn forward_request_digest(request: &ForwardRequest) -> Hash {
    let encoded = (
        sol_address(&request.from),
        sol_address(&request.to),
        U256::from(request.value),
        U256::from(request.gas),
        U256::from(request.nonce),
        sol_bytes(&request.data),
    )
        .abi_encode_params();
    digest(&encoded)
}

/// Compute the message a notary prover signs for a delivery.
pub fn attestation_digest(request_hash: &Hash, response: &[u8]) -> Hash {
    let packed = (sol_hash(request_hash), keccak256(response)).abi_encode_packed();
    digest(&packed)
}

/// Derive the address of the `index`-th account proxy the manager creates
/// for a gateway id.
pub fn account_address(manager: &Address, gateway_id: u64, index: u64) -> Address {
    let packed = (sol_address(manager), U256::from(gateway_id), U256::from(index))
        .abi_encode_packed();
    Address::from_hash_tail(&digest(&packed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlsgate_crypto::{keccak256, keccak256_concat};

    fn test_template() -> TemplatedRequest {
        TemplatedRequest::new(
            keccak256(b"request template"),
            keccak256(b"response template"),
            vec![1, 2, 3],
            vec![vec![0x11; 32], vec![0x22; 32], vec![0x33; 32]],
        )
    }

    #[test]
    fn test_request_id_matches_manual_packing() {
        let gateway = Address([0xaa; 20]);
        let account = Address([0xbb; 20]);

        let mut packed = Vec::new();
        packed.extend_from_slice(&gateway.0);
        packed.extend_from_slice(&account.0);
        let mut nonce = [0u8; 32];
        nonce[31] = 5;
        packed.extend_from_slice(&nonce);

        assert_eq!(request_id(&gateway, &account, 5), keccak256(&packed));
    }

    #[test]
    fn test_request_id_order_sensitive() {
        let a = Address([0xaa; 20]);
        let b = Address([0xbb; 20]);
        assert_ne!(request_id(&a, &b, 0), request_id(&b, &a, 0));
    }

    #[test]
    fn test_template_hash_binds_every_field() {
        let template = test_template();
        let base = template_request_hash("https://httpbin.org", "httpbin.org", &[], &template);

        assert_ne!(
            base,
            template_request_hash("https://httpbin.orh", "httpbin.org", &[], &template)
        );
        assert_ne!(
            base,
            template_request_hash("https://httpbin.org", "httpbin.orh", &[], &template)
        );
        assert_ne!(
            base,
            template_request_hash("https://httpbin.org", "httpbin.org", &[0], &template)
        );

        let mut fields = template.clone();
        fields.fields[0] = 9;
        assert_ne!(
            base,
            template_request_hash("https://httpbin.org", "httpbin.org", &[], &fields)
        );

        let mut values = template.clone();
        values.values[2][31] ^= 1;
        assert_ne!(
            base,
            template_request_hash("https://httpbin.org", "httpbin.org", &[], &values)
        );
    }

    #[test]
    fn test_template_hash_ignores_response_template() {
        let template = test_template();
        let mut other = template.clone();
        other.response_template_hash = keccak256(b"other");
        assert_eq!(
            template_request_hash("r", "s", &[], &template),
            template_request_hash("r", "s", &[], &other)
        );
    }

    #[test]
    fn test_compact_hash_binds_nonce() {
        let id = keccak256(b"id");
        let requester = Address([1u8; 20]);
        assert_ne!(
            compact_request_hash(&id, &requester, &[], 0),
            compact_request_hash(&id, &requester, &[], 1)
        );
    }

    #[test]
    fn test_forward_digest_binds_fields() {
        let request = ForwardRequest {
            from: Address([1u8; 20]),
            to: Address([2u8; 20]),
            value: 0,
            gas: 100_000,
            nonce: 0,
            data: vec![1, 2, 3],
        };
        let base = forward_request_digest(&request);

        let mut changed = request.clone();
        changed.value = 1;
        assert_ne!(base, forward_request_digest(&changed));

        let mut changed = request.clone();
        changed.data.push(4);
        assert_ne!(base, forward_request_digest(&changed));
    }

    #[test]
    fn test_attestation_digest_layout() {
        let request_hash = keccak256(b"request");
        assert_eq!(
            attestation_digest(&request_hash, b"{}"),
            keccak256_concat(&[&request_hash.0, &keccak256(b"{}").0])
        );
    }

    #[test]
    fn test_account_address_depends_on_index() {
        let manager = Address([7u8; 20]);
        assert_ne!(account_address(&manager, 1, 0), account_address(&manager, 1, 1));
        assert_ne!(account_address(&manager, 1, 0), account_address(&manager, 2, 0));
    }
}
