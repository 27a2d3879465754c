// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! EIP-191 signing and recovery over canonical profile messages.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use sonic_profile_node::crypto::{
    address_of, build_profile_message, recover_signer_address, sign_message,
    CREATE_PROFILE_ACTION,
};
use sonic_profile_node::ProfileError;

fn test_key() -> [u8; 32] {
    SigningKey::random(&mut OsRng).to_bytes().into()
}

#[test]
fn test_recovery_returns_exact_signer() {
    let key = test_key();
    let address = address_of(&key).unwrap();

    let hash = format!("0x{}", "a".repeat(64));
    let message = build_profile_message(
        CREATE_PROFILE_ACTION,
        "storj://sonic-profile/profiles/x/profile.json",
        &hash,
        "alice123",
        &address,
    );

    let signature = sign_message(&key, &message).unwrap();
    let recovered = recover_signer_address(&signature, &message).unwrap();

    assert_eq!(recovered, address);
    assert_eq!(recovered.len(), 42);
    assert!(recovered.starts_with("0x"));
}

#[test]
fn test_any_single_field_change_breaks_recovery() {
    let key = test_key();
    let address = address_of(&key).unwrap();
    let hash = format!("0x{}", "a".repeat(64));
    let other_hash = format!("0x{}", "b".repeat(64));

    let locator = "storj://sonic-profile/profiles/x/profile.json";
    let message =
        build_profile_message(CREATE_PROFILE_ACTION, locator, &hash, "alice123", &address);
    let signature = sign_message(&key, &message).unwrap();

    let variants = [
        build_profile_message(CREATE_PROFILE_ACTION, locator, &hash, "alice124", &address),
        build_profile_message(CREATE_PROFILE_ACTION, locator, &other_hash, "alice123", &address),
        build_profile_message(CREATE_PROFILE_ACTION, "storj://sonic-profile/profiles/y/profile.json", &hash, "alice123", &address),
    ];

    for variant in variants {
        match recover_signer_address(&signature, &variant) {
            Ok(recovered) => assert_ne!(recovered, address, "variant verified: {}", variant),
            Err(_) => {} // failed recovery also rejects the request
        }
    }
}

#[test]
fn test_signature_hex_format() {
    let key = test_key();
    let sig = sign_message(&key, "format check").unwrap();

    assert!(sig.starts_with("0x"));
    assert_eq!(sig.len(), 132);

    let bytes = hex::decode(&sig[2..]).unwrap();
    assert_eq!(bytes.len(), 65);
    assert!(bytes[64] == 27 || bytes[64] == 28);
}

#[test]
fn test_malformed_signatures_rejected() {
    for bad in ["", "0x", "0x1234", "not hex at all"] {
        let result = recover_signer_address(bad, "message");
        assert!(
            matches!(result, Err(ProfileError::MalformedSignature(_))),
            "accepted: {:?}",
            bad
        );
    }

    // Correct length, out-of-range v value
    let mut bytes = [0u8; 65];
    bytes[64] = 5;
    let bad_v = format!("0x{}", hex::encode(bytes));
    assert!(recover_signer_address(&bad_v, "message").is_err());
}
