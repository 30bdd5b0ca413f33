//! Helper functions for creating test fixtures.
//!
//! Provides fixed test addresses, a ready-to-submit request, forward request
//! signing and a pre-configured gateway with one funded account.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tlsgate_crypto::{
    address_from_public_key, keccak256, public_key_from_private, sign_digest, Address, PrivateKey,
    Signature,
};
use tlsgate_ops::{DefaultProtocol, OwnerCap, Protocol, ProtocolConfig};
use tlsgate_store::TokenLedger;
use tlsgate_types::{Amount, ForwardRequest, GatewayId, SubmitRequest, TemplatedRequest, GWEI};
use tlsgate_wire::forward_request_digest;

use crate::MockResponseHandler;

/// Gateway id registered by [`create_test_gateway`].
pub const TEST_GATEWAY_ID: GatewayId = 1;

/// `max_response_bytes` of [`test_submit`].
pub const TEST_MAX_RESPONSE_BYTES: u64 = 10_240;

/// Payment token minted to the test account.
pub const TEST_FUNDING: Amount = 1_000_000 * GWEI;

/// Owner of the test protocol.
pub fn test_owner() -> Address {
    Address([0x01; 20])
}

/// Account manager address.
pub fn test_manager() -> Address {
    Address([0x02; 20])
}

/// Gateway registered under [`TEST_GATEWAY_ID`].
pub fn test_gateway() -> Address {
    Address([0x03; 20])
}

/// Payment token.
pub fn test_token() -> Address {
    Address([0x04; 20])
}

/// Account beacon.
pub fn test_beacon() -> Address {
    Address([0x05; 20])
}

/// Three 32-byte template values.
pub fn test_values() -> Vec<Vec<u8>> {
    vec![
        keccak256(b"value 1").as_bytes().to_vec(),
        keccak256(b"value 2").as_bytes().to_vec(),
        keccak256(b"value 3").as_bytes().to_vec(),
    ]
}

/// Template with fields `[1, 2, 3]` over [`test_values`].
pub fn test_template() -> TemplatedRequest {
    TemplatedRequest::new(
        keccak256(b"request template"),
        keccak256(b"response template"),
        vec![1, 2, 3],
        test_values(),
    )
}

/// Fee [`test_submit`] needs at the default rate of 1 gwei per byte.
pub fn test_fee() -> Amount {
    (96 + TEST_MAX_RESPONSE_BYTES as Amount) * GWEI
}

/// A submission to httpbin.org offering `fee`.
pub fn test_submit(fee: Amount) -> SubmitRequest {
    SubmitRequest::new(
        "https://httpbin.org/get",
        "httpbin.org",
        test_template(),
        fee,
        TEST_MAX_RESPONSE_BYTES,
    )
    .with_encrypted_key(b"encrypted key".to_vec())
}

/// A deterministic secp256k1 signer and its address.
pub fn test_signer() -> (PrivateKey, Address) {
    let key = PrivateKey::from_bytes([0x42; 32]);
    let public_key = public_key_from_private(&key).unwrap();
    (key, address_from_public_key(&public_key))
}

/// Sign a forward request.
pub fn sign_forward(key: &PrivateKey, request: &ForwardRequest) -> Signature {
    sign_digest(key, &forward_request_digest(request)).unwrap()
}

/// A protocol with one registered gateway and one funded account.
pub struct TestGateway {
    /// The protocol under test
    pub protocol: DefaultProtocol,
    /// Owner capability
    pub cap: OwnerCap,
    /// Owner address
    pub owner: Address,
    /// Gateway address
    pub gateway: Address,
    /// Payment token
    pub token: Address,
    /// Account proxy bound to `gateway` and funded with [`TEST_FUNDING`]
    pub account: Address,
    /// Clone of the account's response handler
    pub handler: MockResponseHandler,
}

impl TestGateway {
    /// Payment token balance of `holder`.
    pub fn balance(&self, holder: &Address) -> Amount {
        self.protocol.balance_of(&self.token, holder)
    }
}

/// Create a test gateway with the default configuration.
pub fn create_test_gateway() -> TestGateway {
    create_test_gateway_with_config(ProtocolConfig::default())
}

/// Create a test gateway from `config`. The payment token is always
/// [`test_token`].
pub fn create_test_gateway_with_config(config: ProtocolConfig) -> TestGateway {
    let owner = test_owner();
    let gateway = test_gateway();
    let token = test_token();

    let mut protocol = Protocol::new(owner, test_manager(), config.with_payment_token(token));
    let cap = protocol.owner_cap(&owner).unwrap();
    protocol.set_gateway(&cap, TEST_GATEWAY_ID, gateway).unwrap();
    protocol.set_account_beacon(&cap, test_beacon()).unwrap();

    let handler = MockResponseHandler::new();
    let account = protocol
        .create_account(&cap, TEST_GATEWAY_ID, Arc::new(handler.clone()))
        .unwrap();
    protocol
        .ledger_mut()
        .mint(&token, &account, TEST_FUNDING)
        .unwrap();

    TestGateway {
        protocol,
        cap,
        owner,
        gateway,
        token,
        account,
        handler,
    }
}

/// Write `contents` to a `tlsgate.toml` in a fresh temp directory.
///
/// Returns the directory (keep it alive for the duration of the test) and
/// the file path.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tlsgate.toml");
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}
