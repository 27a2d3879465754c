// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Creation Orchestration
//!
//! Sequences one profile-creation attempt end to end:
//!
//! ```text
//! Idle → ValidatingInput → EncryptingField → UploadingPayload
//!      → BuildingMessage → AwaitingSignature → SubmittingToBoundary
//!      → Succeeded | Failed
//! ```
//!
//! Each step depends on the previous step's output, so the flow is strictly
//! sequential. There are no automatic retries anywhere: re-signing produces
//! a different signature and therefore a different derived key, which
//! invalidates any artifacts encrypted or uploaded under the old key. Every
//! failure aborts the attempt where it stands; uploaded-but-unsubmitted
//! objects are abandoned, not cleaned up (they are content-addressed and
//! harmless if orphaned).

use std::sync::Arc;
use tracing::{info, warn};

use crate::crypto::{
    build_profile_message, commitment_hash, derive_encryption_key, encrypt_field,
    CREATE_PROFILE_ACTION,
};
use crate::error::ProfileError;
use crate::profile::boundary::BoundaryClient;
use crate::profile::types::{
    CreateProfileRequest, CreateProfileResponse, ProfileDocument, ProfileDraft, ProfileExistence,
};
use crate::profile::verifier::validate_nickname;
use crate::profile::wallet::WalletSession;

/// Where a creation attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationPhase {
    Idle,
    ValidatingInput,
    EncryptingField,
    UploadingPayload,
    BuildingMessage,
    AwaitingSignature,
    SubmittingToBoundary,
    Succeeded,
    Failed(ProfileError),
}

/// Result of a completed creation attempt.
#[derive(Debug, Clone)]
pub struct ProfileCreated {
    pub storj_profile_url: String,
    pub legal_name_hash: String,
    pub receipt: CreateProfileResponse,
}

/// One profile-creation session for one wallet.
///
/// The encryption key is derived from a dedicated session-setup signature
/// and lives only inside this value; it is dropped on success, failure, or
/// cancellation alike.
pub struct ProfileCreator {
    wallet: Arc<dyn WalletSession>,
    boundary: Arc<dyn BoundaryClient>,
    phase: CreationPhase,
    encryption_key: Option<[u8; 32]>,
}

impl ProfileCreator {
    pub fn new(wallet: Arc<dyn WalletSession>, boundary: Arc<dyn BoundaryClient>) -> Self {
        Self {
            wallet,
            boundary,
            phase: CreationPhase::Idle,
            encryption_key: None,
        }
    }

    pub fn phase(&self) -> &CreationPhase {
        &self.phase
    }

    /// Session setup: request the key-derivation signature and hold the
    /// derived key in memory. The message carries the address and a caller
    /// nonce so each session derives a distinct key.
    ///
    /// May suspend indefinitely while the user decides; rejection surfaces
    /// as `SigningDenied` and leaves no key behind.
    pub async fn setup_encryption(&mut self, session_nonce: u64) -> Result<(), ProfileError> {
        let message = format!(
            "Sonic Profile Encryption - {} - {}",
            self.wallet.address(),
            session_nonce
        );

        let signature = self.wallet.sign_message(&message).await?;
        self.encryption_key = Some(derive_encryption_key(&signature)?);

        info!("Encryption session ready for {}", self.wallet.address());
        Ok(())
    }

    fn fail(&mut self, error: ProfileError) -> ProfileError {
        warn!("Profile creation failed: {}", error);
        // The key is tied to this attempt's signature; a fresh attempt must
        // re-derive, so nothing from this session is reusable.
        self.encryption_key = None;
        self.phase = CreationPhase::Failed(error.clone());
        error
    }

    /// Run one creation attempt to completion.
    pub async fn create(&mut self, draft: ProfileDraft) -> Result<ProfileCreated, ProfileError> {
        match self.run(draft).await {
            Ok(created) => {
                self.encryption_key = None;
                self.phase = CreationPhase::Succeeded;
                Ok(created)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn run(&mut self, draft: ProfileDraft) -> Result<ProfileCreated, ProfileError> {
        let address = self.wallet.address().to_string();

        // --- ValidatingInput ---
        self.phase = CreationPhase::ValidatingInput;

        let legal_name = draft.legal_name.trim().to_string();
        let nickname = draft.nickname.trim().to_string();

        if legal_name.is_empty() || nickname.is_empty() {
            return Err(ProfileError::Validation(
                "Legal name and nickname are required".to_string(),
            ));
        }
        validate_nickname(&nickname)?;

        let key = self.encryption_key.ok_or_else(|| {
            ProfileError::Validation("Security setup incomplete".to_string())
        })?;

        // Conflict gate before any work: an existing profile fails the
        // attempt here, before encryption, uploads, or a signature request
        if let ProfileExistence::Exists(_) = self.boundary.check_profile(&address).await? {
            return Err(ProfileError::ProfileAlreadyExists);
        }

        // --- EncryptingField ---
        self.phase = CreationPhase::EncryptingField;
        let encrypted_legal_name = encrypt_field(&legal_name, &key)?;

        // --- UploadingPayload: optional media first, then the document ---
        self.phase = CreationPhase::UploadingPayload;

        let profile_picture_url = match &draft.media {
            Some(media) => {
                let receipt = self
                    .boundary
                    .upload_image(media.bytes.clone(), &media.mime_type, &media.filename)
                    .await?;
                info!("Profile picture uploaded: {}", receipt.file_url);
                receipt.file_url
            }
            None => String::new(),
        };

        let document = ProfileDocument::new(&nickname, &profile_picture_url, draft.bio.trim());
        let filename = format!("profiles/{}/profile.json", address);
        let document_value = serde_json::to_value(&document)
            .map_err(|e| ProfileError::StorageUploadFailed(e.to_string()))?;

        let json_receipt = self
            .boundary
            .upload_profile_json(&filename, &document_value)
            .await?;
        let storj_profile_url = json_receipt.file_url;
        info!("Profile document uploaded: {}", storj_profile_url);

        // --- BuildingMessage: commitment over the ciphertext, then the
        // canonical string ---
        self.phase = CreationPhase::BuildingMessage;
        let legal_name_hash = commitment_hash(&encrypted_legal_name)?;

        let message = build_profile_message(
            CREATE_PROFILE_ACTION,
            &storj_profile_url,
            &legal_name_hash,
            &nickname,
            &address,
        );

        // --- AwaitingSignature: user-paced, cancellable ---
        self.phase = CreationPhase::AwaitingSignature;
        let signature = self.wallet.sign_message(&message).await?;

        // --- SubmittingToBoundary ---
        self.phase = CreationPhase::SubmittingToBoundary;
        let receipt = self
            .boundary
            .create_profile(&CreateProfileRequest {
                wallet_address: address.clone(),
                storj_url: storj_profile_url.clone(),
                legal_name_hash: legal_name_hash.clone(),
                nickname,
                signature,
            })
            .await?;

        info!(
            "✅ Profile created for {}: tx {}",
            address, receipt.transaction_hash
        );

        Ok(ProfileCreated {
            storj_profile_url,
            legal_name_hash,
            receipt,
        })
    }
}
