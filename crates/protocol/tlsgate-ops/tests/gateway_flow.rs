//! End-to-end request gateway flows.
//!
//! These tests drive submit, deliver and expire through a protocol built by
//! `create_test_gateway` from `tlsgate_test_utils`.

use std::sync::Arc;

use tlsgate_crypto::{generate_notary_key, notary_sign, Address};
use tlsgate_ops::{
    compute_request_hash, compute_request_hash_compact, GatewayError, ProtocolConfig,
};
use tlsgate_test_utils::*;
use tlsgate_types::{
    ErrorCode, GatewayEvent, ProverId, RequestHashBinding, RequestState, VerifierKind,
    CALLBACK_GAS_BASE, CALLBACK_GAS_PER_BYTE,
};
use tlsgate_wire::attestation_digest;

const RESPONSE: &[u8] = br#"{"origin":"203.0.113.7"}"#;

fn expected_gas(response_len: usize, handler_gas: u64) -> u64 {
    CALLBACK_GAS_BASE + CALLBACK_GAS_PER_BYTE * response_len as u64 + handler_gas
}

// =========================================================================
// Submit and Deliver
// =========================================================================

#[test]
fn test_submit_and_deliver() {
    let mut t = create_test_gateway();
    let fee = test_fee();

    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(fee))
        .unwrap();

    assert_eq!(receipt.required_fee, fee);
    assert_eq!(receipt.fee_paid, fee);
    assert_eq!(t.balance(&t.account), TEST_FUNDING - fee);
    assert_eq!(t.balance(&t.gateway), fee);

    let submit = test_submit(fee);
    let expected_hash = compute_request_hash(
        &submit.remote,
        &submit.server_name,
        &submit.encrypted_key,
        &submit.template,
    );
    assert_eq!(receipt.request_hash, expected_hash);
    assert_eq!(t.protocol.pending_requests(), 1);

    let delivery = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();

    assert_eq!(
        delivery.gas_used,
        expected_gas(RESPONSE.len(), t.handler.gas_per_call())
    );
    assert_eq!(t.handler.call_count(), 1);
    let handled = t.handler.last().unwrap();
    assert_eq!(handled.request_id, receipt.request_id);
    assert_eq!(handled.request_hash, receipt.request_hash);
    assert_eq!(handled.response, RESPONSE.to_vec());

    let record = t.protocol.request(&receipt.request_id).unwrap();
    assert_eq!(record.state, RequestState::Delivered);
    assert_eq!(t.protocol.pending_requests(), 0);
    assert!(matches!(
        t.protocol.events().last(),
        Some(GatewayEvent::RequestEnd { request_id, .. }) if *request_id == receipt.request_id
    ));
}

#[test]
fn test_insufficient_fee_rejected() {
    let mut t = create_test_gateway();
    let events_before = t.protocol.events().len();

    let err = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee() - 1))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientFee);
    assert_eq!(t.balance(&t.account), TEST_FUNDING);
    assert_eq!(t.protocol.request_nonce(&t.gateway, &t.account), 0);
    assert_eq!(t.protocol.events().len(), events_before);
}

#[test]
fn test_overpaying_is_accepted() {
    let mut t = create_test_gateway();
    let fee = test_fee() * 2;

    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(fee))
        .unwrap();

    assert_eq!(receipt.fee_paid, fee);
    assert_eq!(receipt.required_fee, test_fee());
    assert_eq!(t.balance(&t.gateway), fee);
}

#[test]
fn test_response_too_large() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    let response = vec![0x61; 61_440];
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, &response, b"")
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ResponseTooLarge);
    assert_eq!(t.handler.call_count(), 0);
    assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());

    // A response at the limit is fine.
    let response = vec![0x61; TEST_MAX_RESPONSE_BYTES as usize];
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, &response, b"")
        .unwrap();
}

#[test]
fn test_request_ids_follow_nonces() {
    let mut t = create_test_gateway();
    let predicted = t.protocol.predict_request_id(&t.gateway, &t.account);

    let first = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();
    let second = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    assert_eq!(first.nonce, 0);
    assert_eq!(second.nonce, 1);
    assert_eq!(first.request_id, predicted);
    assert_eq!(
        first.request_id,
        tlsgate_wire::request_id(&t.gateway, &t.account, 0)
    );
    assert_eq!(
        second.request_id,
        tlsgate_wire::request_id(&t.gateway, &t.account, 1)
    );
    assert_ne!(first.request_id, second.request_id);

    // Identical submissions bind to the same template hash.
    assert_eq!(first.request_hash, second.request_hash);

    let begun: Vec<_> = t
        .protocol
        .events()
        .iter()
        .filter(|event| event.name() == "RequestBegin")
        .filter_map(|event| event.request_id())
        .collect();
    assert_eq!(begun, vec![first.request_id, second.request_id]);
}

#[test]
fn test_double_delivery_rejected() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();

    assert_eq!(err, GatewayError::AlreadyDelivered(receipt.request_id));
    assert_eq!(t.handler.call_count(), 1);
}

#[test]
fn test_hash_mismatch_rejected() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    for byte in [0usize, 15, 31] {
        let mut tampered = receipt.request_hash;
        tampered.0[byte] ^= 0x01;
        let err = t
            .protocol
            .deliver(t.gateway, receipt.request_id, tampered, RESPONSE, b"")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::HashMismatch);
    }

    let unknown = tlsgate_wire::request_id(&t.gateway, &t.account, 99);
    let err = t
        .protocol
        .deliver(t.gateway, unknown, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::UnknownRequest(unknown));
    assert_eq!(t.handler.call_count(), 0);
}

// =========================================================================
// Authorization
// =========================================================================

#[test]
fn test_disabled_account_rejected() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    t.protocol
        .set_proxy_account(&t.cap, t.account, false)
        .unwrap();

    let err = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized(t.account));

    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized(t.account));

    t.protocol
        .set_proxy_account(&t.cap, t.account, true)
        .unwrap();
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();
}

#[test]
fn test_gateway_checks() {
    let mut t = create_test_gateway();

    let stranger = Address([0x99; 20]);
    let err = t
        .protocol
        .submit(t.account, stranger, test_submit(test_fee()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownGateway);

    // Registered, but the account is bound to the first gateway.
    let other = Address([0x98; 20]);
    t.protocol.set_gateway(&t.cap, 2, other).unwrap();
    let err = t
        .protocol
        .submit(t.account, other, test_submit(test_fee()))
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized(t.account));

    // Rebinding the account moves it.
    t.protocol
        .set_account_to_gateway(&t.cap, t.account, other)
        .unwrap();
    t.protocol
        .submit(t.account, other, test_submit(test_fee()))
        .unwrap();
}

#[test]
fn test_rebound_account_request_stays_with_original_gateway() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();

    let other = Address([0x98; 20]);
    t.protocol.set_gateway(&t.cap, 2, other).unwrap();
    t.protocol
        .set_account_to_gateway(&t.cap, t.account, other)
        .unwrap();

    let err = t
        .protocol
        .deliver(other, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::UnknownRequest(receipt.request_id));
    assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());
    assert_eq!(t.balance(&t.gateway), test_fee());
    assert_eq!(t.balance(&other), 0);
    assert_eq!(t.handler.call_count(), 0);

    // The original gateway still owns the request, but the requester no
    // longer has access to it.
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized(t.account));
}

// =========================================================================
// Rollback
// =========================================================================

#[test]
fn test_failed_callback_rolls_back() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();
    let events_before = t.protocol.events().len();
    let gateway_balance = t.balance(&t.gateway);

    t.handler.set_should_fail(true);
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::CallbackFailed);
    assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());
    assert_eq!(t.protocol.events().len(), events_before);
    assert_eq!(t.balance(&t.gateway), gateway_balance);

    t.handler.set_should_fail(false);
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();
}

#[test]
fn test_unfunded_submit_rolls_back() {
    let mut t = create_test_gateway();
    let unfunded = t
        .protocol
        .create_account(&t.cap, TEST_GATEWAY_ID, Arc::new(MockResponseHandler::new()))
        .unwrap();
    let events_before = t.protocol.events().len();

    let err = t
        .protocol
        .submit(unfunded, t.gateway, test_submit(test_fee()))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientBalance);
    assert_eq!(t.protocol.request_nonce(&t.gateway, &unfunded), 0);
    assert_eq!(t.protocol.events().len(), events_before);
    assert_eq!(t.protocol.pending_requests(), 0);
}

#[test]
fn test_callback_out_of_gas() {
    let mut t = create_test_gateway();
    let submit = test_submit(test_fee()).with_callback_gas_limit(60_000);
    let receipt = t.protocol.submit(t.account, t.gateway, submit).unwrap();

    // 50_000 + 16 * 1_000 exceeds the stipend before the handler runs.
    let response = vec![0x62; 1_000];
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, &response, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::OutOfGas { limit: 60_000 });

    // A short response leaves room for the handler's 21_000.
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, b"ok", b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::OutOfGas { limit: 60_000 });
    assert_eq!(t.handler.call_count(), 0);
    assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());
}

// =========================================================================
// Expiry
// =========================================================================

#[test]
fn test_expire_refunds_fee() {
    let ttl = 60_000;
    let mut t = create_test_gateway_with_config(ProtocolConfig::default().with_request_ttl(ttl));
    let fee = test_fee();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(fee))
        .unwrap();
    assert_eq!(receipt.deadline, Some(t.protocol.now() + ttl));

    let err = t
        .protocol
        .expire(t.gateway, receipt.request_id)
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotExpired { .. }));

    t.protocol.advance_time(ttl);

    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap_err();
    assert_eq!(err, GatewayError::RequestExpired(receipt.request_id));

    let err = t
        .protocol
        .expire(Address([0x99; 20]), receipt.request_id)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let refunded = t.protocol.expire(t.gateway, receipt.request_id).unwrap();
    assert_eq!(refunded, fee);
    assert_eq!(t.balance(&t.account), TEST_FUNDING);
    assert_eq!(t.balance(&t.gateway), 0);
    assert_eq!(
        t.protocol.request(&receipt.request_id).unwrap().state,
        RequestState::Expired
    );
    assert!(matches!(
        t.protocol.events().last(),
        Some(GatewayEvent::RequestExpired { refunded, .. }) if *refunded == fee
    ));

    // No second refund.
    let err = t
        .protocol
        .expire(t.gateway, receipt.request_id)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RequestExpired);
    assert_eq!(t.balance(&t.account), TEST_FUNDING);
}

#[test]
fn test_expire_without_ttl() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();
    assert_eq!(receipt.deadline, None);

    t.protocol.advance_time(u64::MAX);
    let err = t
        .protocol
        .expire(t.gateway, receipt.request_id)
        .unwrap_err();
    assert_eq!(err, GatewayError::ExpiryDisabled);

    // Without a deadline the request stays deliverable.
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();
}

// =========================================================================
// Provers
// =========================================================================

#[test]
fn test_prover_in_use_and_migration() {
    let mut t = create_test_gateway();
    let prover = ProverId::from_label("zk-prover");
    t.protocol
        .set_prover(&t.cap, prover, VerifierKind::Mock, vec![])
        .unwrap();

    let submit = test_submit(test_fee()).with_prover(prover);
    let receipt = t.protocol.submit(t.account, t.gateway, submit).unwrap();
    assert_eq!(t.protocol.get_prover(&prover).unwrap().in_flight, 1);

    let err = t
        .protocol
        .set_prover(&t.cap, prover, VerifierKind::Mock, vec![])
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::ProverInUse {
            prover_id: prover,
            in_flight: 1
        }
    );

    let verifier = MockVerifier::rejecting();
    t.protocol
        .register_verifier(&t.cap, "groth16", Arc::new(verifier.clone()))
        .unwrap();
    t.protocol
        .migrate_prover(
            &t.cap,
            prover,
            VerifierKind::External("groth16".to_string()),
            b"vk".to_vec(),
        )
        .unwrap();

    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"proof")
        .unwrap_err();
    assert_eq!(err, GatewayError::InvalidProof(receipt.request_id));
    assert_eq!(verifier.call_count(), 1);

    verifier.set_accept(true);
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"proof")
        .unwrap();
    assert_eq!(t.protocol.get_prover(&prover).unwrap().in_flight, 0);

    // Idle again, so a plain replacement works.
    t.protocol
        .set_prover(&t.cap, prover, VerifierKind::Mock, vec![])
        .unwrap();
}

#[test]
fn test_unknown_prover_rejected() {
    let mut t = create_test_gateway();
    let submit = test_submit(test_fee()).with_prover(ProverId::from_label("missing"));
    let err = t
        .protocol
        .submit(t.account, t.gateway, submit)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownProver);
    assert_eq!(t.balance(&t.account), TEST_FUNDING);
}

#[test]
fn test_notary_delivery() {
    let mut t = create_test_gateway();
    let (notary_key, notary_public) = generate_notary_key();
    let prover = ProverId::from_label("notary");
    t.protocol
        .set_prover(
            &t.cap,
            prover,
            VerifierKind::Notary,
            notary_public.as_bytes().to_vec(),
        )
        .unwrap();

    let submit = test_submit(test_fee()).with_prover(prover);
    let receipt = t.protocol.submit(t.account, t.gateway, submit).unwrap();

    let forged = notary_sign(
        &notary_key,
        &attestation_digest(&receipt.request_hash, b"something else").0,
    );
    let err = t
        .protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, &forged)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidProof);

    let attestation = notary_sign(
        &notary_key,
        &attestation_digest(&receipt.request_hash, RESPONSE).0,
    );
    t.protocol
        .deliver(
            t.gateway,
            receipt.request_id,
            receipt.request_hash,
            RESPONSE,
            &attestation,
        )
        .unwrap();
    assert_eq!(t.handler.call_count(), 1);
}

// =========================================================================
// Binding, Fees and Events
// =========================================================================

#[test]
fn test_compact_binding() {
    let mut t = create_test_gateway_with_config(
        ProtocolConfig::default().with_binding(RequestHashBinding::Compact),
    );
    let submit = test_submit(test_fee());
    let encrypted_key = submit.encrypted_key.clone();
    let receipt = t.protocol.submit(t.account, t.gateway, submit).unwrap();

    let expected =
        compute_request_hash_compact(&receipt.request_id, &t.account, &encrypted_key, 0);
    assert_eq!(receipt.request_hash, expected);
    assert_eq!(
        t.protocol.request(&receipt.request_id).unwrap().binding,
        RequestHashBinding::Compact
    );

    // The second request gets its own hash under the compact binding.
    let second = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();
    assert_ne!(second.request_hash, receipt.request_hash);

    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();
}

#[test]
fn test_fee_rate_change_and_claim() {
    let mut t = create_test_gateway();
    t.protocol
        .set_token_wei_per_byte(&t.cap, 2_000_000_000)
        .unwrap();

    let err = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientFee);

    let fee = test_fee() * 2;
    t.protocol
        .submit(t.account, t.gateway, test_submit(fee))
        .unwrap();

    let treasury = Address([0x77; 20]);
    t.protocol
        .claim_fee(&t.cap, t.gateway, fee, treasury)
        .unwrap();
    assert_eq!(t.balance(&treasury), fee);
    assert_eq!(t.balance(&t.gateway), 0);

    let err = t
        .protocol
        .claim_fee(&t.cap, t.gateway, 1, treasury)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientBalance);
}

#[test]
fn test_export_events_json() {
    let mut t = create_test_gateway();
    let receipt = t
        .protocol
        .submit(t.account, t.gateway, test_submit(test_fee()))
        .unwrap();
    t.protocol
        .deliver(t.gateway, receipt.request_id, receipt.request_hash, RESPONSE, b"")
        .unwrap();

    let json = t.protocol.export_events_json().unwrap();
    assert!(json.contains("\"account_created\""));
    assert!(json.contains("\"request_begin\""));
    assert!(json.contains("\"request_end\""));
    assert!(json.contains(&receipt.request_id.to_string()));
}
