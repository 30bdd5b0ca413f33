//! Gateway properties over generated inputs.

use proptest::prelude::*;
use proptest::sample::Index;
use tlsgate_ops::{compute_request_hash, compute_request_id};
use tlsgate_test_utils::*;
use tlsgate_types::{ErrorCode, SubmitRequest, GWEI};

/// Swap one character of an ASCII string for a different one.
fn edit_ascii(text: &str, at: Index) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let i = at.index(bytes.len());
    bytes[i] = if bytes[i] == b'a' { b'b' } else { b'a' };
    String::from_utf8(bytes).unwrap()
}

/// Change one byte of one hashed component of `submit`.
fn edit_component(submit: &mut SubmitRequest, component: usize, at: Index, mask: u8) {
    match component {
        0 => submit.remote = edit_ascii(&submit.remote, at),
        1 => submit.server_name = edit_ascii(&submit.server_name, at),
        2 => {
            let i = at.index(submit.encrypted_key.len());
            submit.encrypted_key[i] ^= mask;
        }
        3 => submit.template.request_template_hash.0[at.index(32)] ^= mask,
        4 => {
            let i = at.index(submit.template.fields.len());
            submit.template.fields[i] ^= u64::from(mask);
        }
        _ => {
            let value = at.get_mut(&mut submit.template.values);
            let i = at.index(value.len());
            value[i] ^= mask;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_request_ids_unique_per_nonce(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assume!(a != b);
        let gateway = test_gateway();
        let account = test_owner();
        prop_assert_ne!(
            compute_request_id(&gateway, &account, a),
            compute_request_id(&gateway, &account, b)
        );
    }

    #[test]
    fn prop_fee_boundary(max_response in 1u64..=TEST_MAX_RESPONSE_BYTES) {
        let mut t = create_test_gateway();
        let mut submit = test_submit(0);
        submit.max_response_bytes = max_response;
        let required = (96 + max_response as u128) * GWEI;

        let short = submit.clone().with_fee(required - 1);
        let err = t.protocol.submit(t.account, t.gateway, short).unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::InsufficientFee);

        let exact = submit.with_fee(required);
        let receipt = t.protocol.submit(t.account, t.gateway, exact).unwrap();
        prop_assert_eq!(receipt.required_fee, required);
        prop_assert_eq!(t.balance(&t.gateway), required);
    }

    #[test]
    fn prop_any_flipped_hash_byte_rejected(byte in 0usize..32, mask in 1u8..=255) {
        let mut t = create_test_gateway();
        let receipt = t
            .protocol
            .submit(t.account, t.gateway, test_submit(test_fee()))
            .unwrap();

        let mut tampered = receipt.request_hash;
        tampered.0[byte] ^= mask;
        let err = t
            .protocol
            .deliver(t.gateway, receipt.request_id, tampered, b"{}", b"")
            .unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::HashMismatch);
        prop_assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());
    }

    #[test]
    fn prop_hash_over_edited_request_rejected(
        component in 0usize..6,
        at in any::<Index>(),
        mask in 1u8..=255,
    ) {
        let mut t = create_test_gateway();
        let submit = test_submit(test_fee());
        let receipt = t
            .protocol
            .submit(t.account, t.gateway, submit.clone())
            .unwrap();

        let mut edited = submit;
        edit_component(&mut edited, component, at, mask);
        let hash = compute_request_hash(
            &edited.remote,
            &edited.server_name,
            &edited.encrypted_key,
            &edited.template,
        );
        prop_assert_ne!(hash, receipt.request_hash);

        let err = t
            .protocol
            .deliver(t.gateway, receipt.request_id, hash, b"{}", b"")
            .unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::HashMismatch);
        prop_assert!(t.protocol.request(&receipt.request_id).unwrap().is_pending());
    }

    #[test]
    fn prop_response_limit(len in 0usize..2 * TEST_MAX_RESPONSE_BYTES as usize) {
        let mut t = create_test_gateway();
        let receipt = t
            .protocol
            .submit(t.account, t.gateway, test_submit(test_fee()))
            .unwrap();

        let response = vec![0x20; len];
        let result = t
            .protocol
            .deliver(t.gateway, receipt.request_id, receipt.request_hash, &response, b"");
        if len as u64 <= TEST_MAX_RESPONSE_BYTES {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().code(), ErrorCode::ResponseTooLarge);
        }
    }
}
