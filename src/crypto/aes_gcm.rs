// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-GCM Field Encryption
//!
//! Encrypts a profile's sensitive field (the legal name) with the key
//! derived from a wallet signature, in the Web Crypto API format the web
//! client produces:
//!
//! ```text
//! blob = base64( [nonce (12 bytes) | ciphertext+tag (variable)] )
//! ```
//!
//! - Nonce: 12 bytes (96 bits), freshly random per encryption, never reused
//!   for the same key
//! - Ciphertext+Tag: encrypted data + 16-byte authentication tag
//! - Algorithm: AES-256-GCM, no Additional Authenticated Data
//!
//! Decryption fails closed: a wrong key, a flipped byte, or a truncated
//! blob all surface as `AuthenticationFailure`, never as garbage plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    AeadCore, Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::ProfileError;

/// Nonce length of the Web Crypto AES-GCM format, in bytes.
pub const NONCE_LEN: usize = 12;

/// Encrypt a plaintext field into a self-contained base64 blob.
///
/// Generates a fresh random 12-byte nonce per call. The returned blob is
/// the only artifact that leaves this unit; the key never does.
pub fn encrypt_field(plaintext: &str, key: &[u8; 32]) -> Result<String, ProfileError> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| ProfileError::InsufficientKeyMaterial {
            needed: 32,
            available: key.len(),
        })?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext.as_bytes(),
                aad: b"",
            },
        )
        .map_err(|_| ProfileError::AuthenticationFailure)?;

    // Concatenate nonce + ciphertext+tag, then base64 for transport
    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypt a base64 blob produced by [`encrypt_field`].
///
/// # Errors
///
/// Returns `AuthenticationFailure` if:
/// - the blob is not valid base64
/// - the decoded blob is too short to contain a nonce and a tag
/// - the authentication tag does not verify (wrong key or tampered data)
/// - the decrypted bytes are not valid UTF-8
pub fn decrypt_field(blob: &str, key: &[u8; 32]) -> Result<String, ProfileError> {
    // 1. Decode transport encoding
    let combined = BASE64
        .decode(blob)
        .map_err(|_| ProfileError::AuthenticationFailure)?;

    // 2. Split at the fixed nonce boundary
    if combined.len() < NONCE_LEN {
        return Err(ProfileError::AuthenticationFailure);
    }
    let nonce = Nonce::from_slice(&combined[..NONCE_LEN]);
    let ciphertext = &combined[NONCE_LEN..];

    // 3. Decrypt and verify the authentication tag
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| ProfileError::InsufficientKeyMaterial {
            needed: 32,
            available: key.len(),
        })?;

    let plaintext_bytes = cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: b"",
            },
        )
        .map_err(|_| ProfileError::AuthenticationFailure)?;

    String::from_utf8(plaintext_bytes).map_err(|_| ProfileError::AuthenticationFailure)
}
