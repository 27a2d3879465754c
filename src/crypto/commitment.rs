// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Commitment Hashing
//!
//! Ties the off-chain encrypted legal name to the on-chain profile record
//! without revealing the plaintext. The commitment is SHA-256 over the
//! UTF-8 bytes of the ciphertext blob, hex-encoded with a `0x` prefix for
//! `bytes32` consumption.

use sha2::{Digest, Sha256};

use crate::error::ProfileError;

/// Hex length of a 32-byte digest.
const DIGEST_HEX_LEN: usize = 64;

/// Compute the on-chain commitment hash of a ciphertext blob.
///
/// Deterministic: the same blob always produces the same hash. The result
/// is `0x` followed by exactly 64 lowercase hex characters; anything else
/// is an internal invariant violation and fails with `InvalidDigestLength`
/// rather than being silently padded or truncated.
pub fn commitment_hash(blob: &str) -> Result<String, ProfileError> {
    let digest = Sha256::digest(blob.as_bytes());
    let hex_digest = hex::encode(digest);

    if hex_digest.len() != DIGEST_HEX_LEN {
        return Err(ProfileError::InvalidDigestLength {
            length: hex_digest.len(),
        });
    }

    Ok(format!("0x{}", hex_digest))
}

/// Check that a string is a well-formed commitment hash (`0x` + 64 hex).
pub fn is_commitment_hash(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(rest) => rest.len() == DIGEST_HEX_LEN && rest.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
