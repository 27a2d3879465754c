// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end orchestration runs against an in-process boundary doing
//! real signature verification and persistence into mock backends.

use std::sync::Arc;

use sonic_profile_node::crypto::is_commitment_hash;
use sonic_profile_node::profile::types::{MediaAttachment, ProfileDocument, ProfileDraft};
use sonic_profile_node::storage::StorageError;
use sonic_profile_node::{
    CreationPhase, LocalWalletSession, ProfileCreator, ProfileError, RegistryClientTrait,
    StorjStorage, WalletSession,
};

use super::support::{CancellingWallet, InProcessBoundary};

fn draft(nickname: &str) -> ProfileDraft {
    ProfileDraft {
        legal_name: "Alice Smith".to_string(),
        nickname: nickname.to_string(),
        bio: "streaming since day one".to_string(),
        media: None,
    }
}

#[tokio::test]
async fn test_happy_path_end_to_end() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = Arc::new(LocalWalletSession::random().unwrap());
    let address = wallet.address().to_string();

    let mut creator = ProfileCreator::new(wallet, boundary.clone());
    creator.setup_encryption(1).await.unwrap();

    let created = creator.create(draft("alice123")).await.unwrap();

    assert_eq!(*creator.phase(), CreationPhase::Succeeded);
    assert!(is_commitment_hash(&created.legal_name_hash));
    assert_eq!(
        created.storj_profile_url,
        format!("storj://sonic-profile/profiles/{}/profile.json", address)
    );

    // The profile is committed on-chain...
    assert!(boundary.registry.profile_exists(&address).await.unwrap());
    let onchain = boundary.registry.get_profile(&address).await.unwrap();
    assert_eq!(onchain.storj_profile_url, created.storj_profile_url);
    assert_eq!(onchain.legal_name_hash, created.legal_name_hash);
    assert!(!onchain.legal_name_changed);

    // ...and the document is in the store with the drafted fields
    let stored = boundary
        .store
        .get(&format!("profiles/{}/profile.json", address))
        .await
        .unwrap();
    let document: ProfileDocument = serde_json::from_slice(&stored).unwrap();
    assert_eq!(document.nickname, "alice123");
    assert_eq!(document.bio, "streaming since day one");
    assert_eq!(document.profile_picture, "");
}

#[tokio::test]
async fn test_media_locator_lands_in_document() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = Arc::new(LocalWalletSession::random().unwrap());
    let address = wallet.address().to_string();

    let mut creator = ProfileCreator::new(wallet, boundary.clone());
    creator.setup_encryption(2).await.unwrap();

    let mut d = draft("alice123");
    d.media = Some(MediaAttachment {
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
        mime_type: "image/png".to_string(),
        filename: "me.png".to_string(),
    });
    creator.create(d).await.unwrap();

    let stored = boundary
        .store
        .get(&format!("profiles/{}/profile.json", address))
        .await
        .unwrap();
    let document: ProfileDocument = serde_json::from_slice(&stored).unwrap();
    assert!(document
        .profile_picture
        .starts_with("storj://sonic-profile/profile-pictures/"));
}

#[tokio::test]
async fn test_nickname_bounds_at_the_edges() {
    // 2 chars rejected pre-flight, exactly 3 and exactly 20 accepted
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = Arc::new(LocalWalletSession::random().unwrap());
    let mut creator = ProfileCreator::new(wallet, boundary.clone());
    creator.setup_encryption(3).await.unwrap();

    let err = creator.create(draft("ab")).await.unwrap_err();
    assert!(matches!(err, ProfileError::Validation(_)));

    let wallet3 = Arc::new(LocalWalletSession::random().unwrap());
    let mut creator3 = ProfileCreator::new(wallet3, boundary.clone());
    creator3.setup_encryption(4).await.unwrap();
    creator3.create(draft("abc")).await.unwrap();

    let wallet20 = Arc::new(LocalWalletSession::random().unwrap());
    let mut creator20 = ProfileCreator::new(wallet20, boundary.clone());
    creator20.setup_encryption(5).await.unwrap();
    creator20.create(draft(&"x".repeat(20))).await.unwrap();
}

#[tokio::test]
async fn test_second_attempt_conflicts_before_signing() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = LocalWalletSession::random().unwrap();
    // Three signatures: setup, creation, second setup. A fourth request
    // would be denied.
    let wallet = Arc::new(CancellingWallet::new(wallet, 3));

    let mut creator = ProfileCreator::new(wallet.clone(), boundary.clone());
    creator.setup_encryption(6).await.unwrap();
    creator.create(draft("alice123")).await.unwrap();

    // The conflict gate must fire before any signing request: if the second
    // attempt reached the signing step it would fail with SigningDenied
    let mut second = ProfileCreator::new(wallet, boundary.clone());
    second.setup_encryption(7).await.unwrap();
    let err = second.create(draft("alice456")).await.unwrap_err();
    assert_eq!(err, ProfileError::ProfileAlreadyExists);
}

#[tokio::test]
async fn test_cancellation_at_signature_abandons_artifacts() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = LocalWalletSession::random().unwrap();
    let address = wallet.address().to_string();
    // Allow only the setup signature; deny the creation signature
    let cancelling = Arc::new(CancellingWallet::new(wallet, 1));

    let mut creator = ProfileCreator::new(cancelling, boundary.clone());
    creator.setup_encryption(9).await.unwrap();

    let err = creator.create(draft("alice123")).await.unwrap_err();
    assert_eq!(err, ProfileError::SigningDenied);
    assert_eq!(*creator.phase(), CreationPhase::Failed(ProfileError::SigningDenied));

    // Nothing was committed on-chain...
    assert!(!boundary.registry.profile_exists(&address).await.unwrap());

    // ...but the uploaded document is simply abandoned, not cleaned up
    assert!(boundary
        .store
        .exists(&format!("profiles/{}/profile.json", address))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_storage_outage_fails_the_attempt() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = Arc::new(LocalWalletSession::random().unwrap());

    let mut creator = ProfileCreator::new(wallet, boundary.clone());
    creator.setup_encryption(10).await.unwrap();

    boundary
        .store
        .inject_error(StorageError::NetworkError("gateway down".to_string()))
        .await;

    let err = creator.create(draft("alice123")).await.unwrap_err();
    assert!(matches!(err, ProfileError::StorageUploadFailed(_)));
}

#[tokio::test]
async fn test_registry_outage_is_not_treated_as_absence() {
    let boundary = Arc::new(InProcessBoundary::new());
    let wallet = Arc::new(LocalWalletSession::random().unwrap());

    let mut creator = ProfileCreator::new(wallet, boundary.clone());
    creator.setup_encryption(11).await.unwrap();

    boundary.registry.set_read_error("rpc unreachable").await;

    let err = creator.create(draft("alice123")).await.unwrap_err();
    assert!(matches!(err, ProfileError::ExistenceUnknown(_)));
}
