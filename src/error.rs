// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Flow Error Taxonomy
//!
//! Every failure in the profile-creation flow maps to exactly one variant
//! here, at the point where it happens. Boundary rejections carry the
//! original reason string unrewritten so callers can show the specific
//! cause. Integrity failures (`AuthenticationFailure`, `InvalidDigestLength`)
//! stay distinguishable from user-correctable validation errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    /// Pre-flight input validation failed (empty field, nickname bounds).
    /// Non-retryable without user correction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The wallet user rejected a signing request. Fatal to the current
    /// attempt; a fresh attempt re-derives everything from a new signature.
    #[error("Signing request denied by wallet")]
    SigningDenied,

    /// Signature bytes could not be parsed (wrong length, bad hex, invalid
    /// recovery id).
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// AEAD authentication failed on decrypt: wrong key or tampered blob.
    /// Never downgraded to a generic message.
    #[error("Decryption failed: authentication error (wrong key or tampered data)")]
    AuthenticationFailure,

    /// The derived key material was shorter than the cipher requires.
    /// Configuration error, should never occur with SHA-256.
    #[error("Insufficient key material: need {needed} bytes, have {available}")]
    InsufficientKeyMaterial { needed: usize, available: usize },

    /// Commitment digest hex was not exactly 64 characters. Internal
    /// invariant violation, fails loudly instead of padding or truncating.
    #[error("Invalid digest length: expected 64 hex chars, got {length}")]
    InvalidDigestLength { length: usize },

    /// The opaque store was unavailable or rejected the payload.
    #[error("Storage upload failed: {0}")]
    StorageUploadFailed(String),

    /// Recovered signer does not match the claimed wallet address.
    #[error("Signature verification failed: recovered {recovered}, expected {claimed}")]
    SignatureInvalid { recovered: String, claimed: String },

    /// A profile already exists for this address. The canonical conflict
    /// signal for concurrent creation attempts on the same identity.
    #[error("Profile already exists")]
    ProfileAlreadyExists,

    /// The requested nickname is already registered on-chain.
    #[error("Nickname already taken")]
    NicknameTaken,

    /// The registry could not be read, so existence is unknown. Distinct
    /// from a confirmed `exists == false` answer.
    #[error("Profile existence unknown: {0}")]
    ExistenceUnknown(String),

    /// Boundary-reported business rejection, reason passed through verbatim.
    #[error("{0}")]
    Boundary(String),

    /// Registry transaction or read failed after validation passed.
    #[error("Registry error: {0}")]
    Registry(String),

    /// A network call exceeded its deadline.
    #[error("Request timed out")]
    Timeout,
}

impl ProfileError {
    /// True for failures a user can fix by changing their input and
    /// re-initiating. Integrity and infrastructure failures return false.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ProfileError::Validation(_)
                | ProfileError::NicknameTaken
                | ProfileError::ProfileAlreadyExists
        )
    }
}
