// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Boundary-Side Signature Verification
//!
//! Reconstructs the canonical profile message from the discrete request
//! fields — never from a client-supplied message string — recovers the
//! signer, and compares against the claimed address case-insensitively.
//! The existence gate runs separately in the handler against the registry.

use crate::crypto::{
    build_profile_message, is_commitment_hash, recover_signer_address, CREATE_PROFILE_ACTION,
};
use crate::error::ProfileError;
use crate::storage::LOCATOR_SCHEME;

pub const NICKNAME_MIN_LEN: usize = 3;
pub const NICKNAME_MAX_LEN: usize = 20;

/// Check nickname length bounds.
pub fn validate_nickname(nickname: &str) -> Result<(), ProfileError> {
    let len = nickname.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return Err(ProfileError::Validation(
            "Nickname must be 3-20 characters".to_string(),
        ));
    }
    Ok(())
}

/// Check that an address looks like 0x + 40 hex chars.
pub fn validate_address(address: &str) -> Result<(), ProfileError> {
    let rest = address
        .strip_prefix("0x")
        .ok_or_else(|| ProfileError::Validation("Invalid wallet address".to_string()))?;
    if rest.len() != 40 || !rest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProfileError::Validation(
            "Invalid wallet address".to_string(),
        ));
    }
    Ok(())
}

/// Verify a profile-creation request.
///
/// Validation order: locator prefix → commitment hash format → nickname
/// bounds → signature recovery and match. Returns the recovered address on
/// success.
pub fn verify_create_profile(
    claimed_address: &str,
    storj_url: &str,
    legal_name_hash: &str,
    nickname: &str,
    signature: &str,
) -> Result<String, ProfileError> {
    if !storj_url.starts_with(LOCATOR_SCHEME) {
        return Err(ProfileError::Validation("Invalid Storj URL".to_string()));
    }

    if !is_commitment_hash(legal_name_hash) {
        return Err(ProfileError::Validation(
            "Invalid legal name hash format. Must be 32 bytes hex string.".to_string(),
        ));
    }

    validate_nickname(nickname)?;

    // Reconstruct the exact message the client signed
    let message = build_profile_message(
        CREATE_PROFILE_ACTION,
        storj_url,
        legal_name_hash,
        nickname,
        claimed_address,
    );

    let recovered = recover_signer_address(signature, &message)?;

    if recovered.to_lowercase() != claimed_address.to_lowercase() {
        return Err(ProfileError::SignatureInvalid {
            recovered,
            claimed: claimed_address.to_string(),
        });
    }

    Ok(recovered)
}
