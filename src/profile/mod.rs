// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Creation Flow
//!
//! Client-side orchestration of wallet-authenticated profile creation plus
//! the boundary-side verification it is checked against:
//!
//! 1. Session setup signature → derived encryption key
//! 2. Legal name encrypted, media + document uploaded to the opaque store
//! 3. Commitment hash + canonical message built from the upload locator
//! 4. Wallet signs the message, the boundary reconstructs and verifies it
//! 5. Verified requests are committed on-chain through the registry

pub mod boundary;
pub mod orchestrator;
pub mod types;
pub mod verifier;
pub mod wallet;

pub use boundary::{BoundaryClient, HttpBoundaryClient};
pub use orchestrator::{CreationPhase, ProfileCreated, ProfileCreator};
pub use types::{
    CheckProfileRequest, CheckProfileResponse, CreateProfileRequest, CreateProfileResponse,
    JsonUploadRequest, JsonUploadResponse, MediaAttachment, ProfileDocument, ProfileDraft,
    ProfileExistence, ProfileInfo, ProfilePreferences, UploadResponse,
};
pub use verifier::{
    validate_address, validate_nickname, verify_create_profile, NICKNAME_MAX_LEN,
    NICKNAME_MIN_LEN,
};
pub use wallet::{DenyingWalletSession, LocalWalletSession, WalletSession};
