// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Integrity Primitives
//!
//! The cryptographic pipeline behind profile creation:
//!
//! - **Key Derivation**: AES key derived from a wallet signature over the
//!   session-setup message
//! - **AES-GCM**: authenticated encryption of the legal-name field
//! - **Commitment**: SHA-256 hash tying the ciphertext to the on-chain record
//! - **Message**: canonical string both sides sign and verify byte-for-byte
//! - **Signature**: EIP-191 signing and signer-address recovery
//!
//! ## Security Considerations
//!
//! - Derived keys live in memory for one creation session, never persisted
//! - Nonces are fresh per encryption; a re-signed session yields a new key
//! - The boundary only ever reconstructs the message from discrete fields,
//!   never accepts a client-supplied message string

pub mod aes_gcm;
pub mod commitment;
pub mod key_derivation;
pub mod message;
pub mod signature;

pub use aes_gcm::{decrypt_field, encrypt_field};
pub use commitment::{commitment_hash, is_commitment_hash};
pub use key_derivation::derive_encryption_key;
pub use message::{build_profile_message, CREATE_PROFILE_ACTION};
pub use signature::{address_of, recover_signer_address, sign_message};
