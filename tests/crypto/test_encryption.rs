// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Round-trip, authentication, and tamper-detection properties of the
//! field encryption unit.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sonic_profile_node::crypto::{decrypt_field, derive_encryption_key, encrypt_field};
use sonic_profile_node::ProfileError;

#[test]
fn test_round_trip_various_plaintexts() {
    let key = derive_encryption_key("0xround-trip").unwrap();

    for plaintext in ["Alice Smith", "", "名前", "a", &"x".repeat(4096)] {
        let blob = encrypt_field(plaintext, &key).unwrap();
        assert_eq!(decrypt_field(&blob, &key).unwrap(), plaintext);
    }
}

#[test]
fn test_blob_is_base64_with_nonce_and_tag() {
    let key = derive_encryption_key("0xformat").unwrap();
    let blob = encrypt_field("payload", &key).unwrap();

    let raw = BASE64.decode(&blob).unwrap();
    // 12-byte nonce + ciphertext + 16-byte tag
    assert!(raw.len() >= 12 + "payload".len() + 16);
}

#[test]
fn test_decrypt_with_other_sessions_key_fails() {
    let key1 = derive_encryption_key("0xsession-one").unwrap();
    let key2 = derive_encryption_key("0xsession-two").unwrap();

    let blob = encrypt_field("Alice Smith", &key1).unwrap();
    assert_eq!(
        decrypt_field(&blob, &key2),
        Err(ProfileError::AuthenticationFailure)
    );
}

#[test]
fn test_every_single_byte_flip_is_detected() {
    let key = derive_encryption_key("0xtamper").unwrap();
    let blob = encrypt_field("short secret", &key).unwrap();
    let mut raw = BASE64.decode(&blob).unwrap();

    for i in 0..raw.len() {
        raw[i] ^= 0x80;
        let tampered = BASE64.encode(&raw);
        assert_eq!(
            decrypt_field(&tampered, &key),
            Err(ProfileError::AuthenticationFailure),
            "flip at byte {} returned plaintext",
            i
        );
        raw[i] ^= 0x80;
    }
}

#[test]
fn test_truncated_blob_fails_closed() {
    let key = derive_encryption_key("0xtruncate").unwrap();
    let blob = encrypt_field("secret", &key).unwrap();
    let raw = BASE64.decode(&blob).unwrap();

    for keep in [0, 5, 11, 12, raw.len() - 1] {
        let truncated = BASE64.encode(&raw[..keep]);
        assert!(
            decrypt_field(&truncated, &key).is_err(),
            "truncation to {} bytes accepted",
            keep
        );
    }
}
