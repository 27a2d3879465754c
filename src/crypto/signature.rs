// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! EIP-191 Signing and Signature Recovery
//!
//! Wallets sign the canonical profile message with `personal_sign`, which
//! prefixes the message before hashing. Recovery reverses that: hash the
//! reconstructed message the same way, recover the public key from the
//! 65-byte signature, and derive the Ethereum address with Keccak-256.
//!
//! ## Signature Format
//! - 65 bytes: r (32) + s (32) + v (1)
//! - Hex string with 0x prefix: `0x` + 130 hex characters
//! - v is 27/28 (Ethereum standard) or the raw recovery id 0/1

use k256::ecdsa::{
    signature::hazmat::PrehashSigner, RecoveryId, Signature, SigningKey, VerifyingKey,
};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ProfileError;

/// Create the EIP-191 message hash:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`
pub fn eip191_hash(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());

    let mut hasher = Keccak::v256();
    hasher.update(prefix.as_bytes());
    hasher.update(message);

    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}

/// Sign a message with `personal_sign` semantics.
///
/// Returns the 65-byte signature (r + s + v, v in {27, 28}) as a 0x-prefixed
/// hex string, the format wallets hand back to the web client.
pub fn sign_message(private_key: &[u8; 32], message: &str) -> Result<String, ProfileError> {
    let message_hash = eip191_hash(message.as_bytes());

    let signing_key = SigningKey::from_bytes(private_key.into())
        .map_err(|e| ProfileError::MalformedSignature(format!("invalid private key: {}", e)))?;

    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(&message_hash)
        .map_err(|e| ProfileError::MalformedSignature(format!("signing failed: {}", e)))?;

    let mut sig_bytes = [0u8; 65];
    sig_bytes[..64].copy_from_slice(&signature.to_bytes());
    sig_bytes[64] = recovery_id.to_byte() + 27; // Ethereum v value

    Ok(format!("0x{}", hex::encode(sig_bytes)))
}

/// Recover the signer's Ethereum address from a `personal_sign` signature
/// over `message`.
///
/// The returned address is `0x` + 40 lowercase hex characters. Comparisons
/// against claimed addresses must stay case-insensitive.
///
/// # Errors
///
/// `MalformedSignature` if the hex cannot be decoded, the signature is not
/// exactly 65 bytes, the v value is out of range, or public-key recovery
/// fails.
pub fn recover_signer_address(signature: &str, message: &str) -> Result<String, ProfileError> {
    // 1. Decode the 0x-prefixed hex signature
    let sig_bytes = hex::decode(signature.trim_start_matches("0x"))
        .map_err(|e| ProfileError::MalformedSignature(format!("invalid hex: {}", e)))?;

    if sig_bytes.len() != 65 {
        return Err(ProfileError::MalformedSignature(format!(
            "expected 65 bytes, got {}",
            sig_bytes.len()
        )));
    }

    // 2. Split r+s from v, normalizing Ethereum-style 27/28 to 0/1
    let mut v = sig_bytes[64];
    if v >= 27 {
        v -= 27;
    }
    if v > 3 {
        return Err(ProfileError::MalformedSignature(format!(
            "invalid recovery id: {}",
            sig_bytes[64]
        )));
    }

    let recovery_id = RecoveryId::try_from(v)
        .map_err(|e| ProfileError::MalformedSignature(format!("invalid recovery id: {}", e)))?;

    let parsed = Signature::try_from(&sig_bytes[..64])
        .map_err(|e| ProfileError::MalformedSignature(format!("invalid signature: {}", e)))?;

    // 3. Recover the public key over the EIP-191 hash
    let message_hash = eip191_hash(message.as_bytes());
    let verifying_key = VerifyingKey::recover_from_prehash(&message_hash, &parsed, recovery_id)
        .map_err(|e| ProfileError::MalformedSignature(format!("recovery failed: {}", e)))?;

    // 4. Derive the Ethereum address: keccak256(uncompressed pubkey)[12..]
    let public_key = verifying_key.to_encoded_point(false);
    let public_key_bytes = public_key.as_bytes();

    let mut hasher = Keccak::v256();
    let mut hash = [0u8; 32];
    hasher.update(&public_key_bytes[1..]); // Skip the 0x04 prefix byte
    hasher.finalize(&mut hash);

    Ok(format!("0x{}", hex::encode(&hash[12..])))
}

/// Derive the Ethereum address of a private key. Used by local wallet
/// sessions and tests; production signers live outside this crate.
pub fn address_of(private_key: &[u8; 32]) -> Result<String, ProfileError> {
    let signing_key = SigningKey::from_bytes(private_key.into())
        .map_err(|e| ProfileError::MalformedSignature(format!("invalid private key: {}", e)))?;

    let public_key = signing_key.verifying_key().to_encoded_point(false);

    let mut hasher = Keccak::v256();
    let mut hash = [0u8; 32];
    hasher.update(&public_key.as_bytes()[1..]);
    hasher.finalize(&mut hash);

    Ok(format!("0x{}", hex::encode(&hash[12..])))
}
