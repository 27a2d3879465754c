// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature-Based Key Derivation
//!
//! Derives the AES-256 key that protects a profile's sensitive fields from
//! a wallet signature over the session-setup message. The derivation must
//! match the web client byte for byte:
//!
//! ```text
//! key = base64(SHA-256(utf8(signature)))[0..32]
//! ```
//!
//! Base64 output is ASCII, so the first 32 characters are the first 32
//! bytes. The key is deterministic for a given signature and held in memory
//! only for the duration of one creation session.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};

use crate::error::ProfileError;

/// Number of key bytes AES-256-GCM requires.
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte symmetric key from a wallet signature string.
///
/// Deterministic: the same signature always yields the same key. Wallet
/// signatures embed a nonce, so two signing sessions for the same address
/// yield different keys, which is why uploaded-but-unsubmitted artifacts
/// from an aborted attempt can never be reused.
pub fn derive_encryption_key(signature: &str) -> Result<[u8; KEY_LEN], ProfileError> {
    let digest = Sha256::digest(signature.as_bytes());
    let encoded = BASE64.encode(digest);

    if encoded.len() < KEY_LEN {
        return Err(ProfileError::InsufficientKeyMaterial {
            needed: KEY_LEN,
            available: encoded.len(),
        });
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&encoded.as_bytes()[..KEY_LEN]);
    Ok(key)
}
