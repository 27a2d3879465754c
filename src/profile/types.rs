// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Wire and Domain Types
//!
//! JSON shapes shared between the orchestrating client and the boundary
//! API. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User preferences stored in the profile document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfilePreferences {
    pub autoplay: bool,
    pub quality: String,
}

impl Default for ProfilePreferences {
    fn default() -> Self {
        Self {
            autoplay: true,
            quality: "1080p".to_string(),
        }
    }
}

/// The profile JSON document kept in the opaque store at
/// `profiles/<walletAddress>/profile.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub nickname: String,
    /// `storj://` locator of the profile picture, empty if none was uploaded.
    pub profile_picture: String,
    pub bio: String,
    #[serde(default)]
    pub social_links: HashMap<String, String>,
    #[serde(default)]
    pub watch_history: Vec<String>,
    pub total_rewards_earned: String,
    pub preferences: ProfilePreferences,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProfileDocument {
    pub fn new(nickname: &str, profile_picture: &str, bio: &str) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            nickname: nickname.to_string(),
            profile_picture: profile_picture.to_string(),
            bio: bio.to_string(),
            social_links: HashMap::new(),
            watch_history: Vec::new(),
            total_rewards_earned: "0".to_string(),
            preferences: ProfilePreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional media attached to a profile draft.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

/// Input to the creation orchestrator, as collected from the user.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub legal_name: String,
    pub nickname: String,
    pub bio: String,
    pub media: Option<MediaAttachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckProfileRequest {
    pub wallet_address: String,
}

/// Combined on-chain record + stored document, as the check endpoint
/// returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub wallet_address: String,
    pub storj_profile_url: String,
    pub legal_name_hash: String,
    pub legal_name_changed: bool,
    pub created_at: String,
    pub nonce: String,
    #[serde(flatten)]
    pub document: Option<ProfileDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckProfileResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<ProfileInfo>,
    /// Set when the on-chain record exists but the stored document could
    /// not be fetched; existence stays authoritative on-chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storj_error: Option<String>,
}

/// Confirmed answer from an existence check. A read failure is an error
/// (`ExistenceUnknown`), never a variant here.
#[derive(Debug, Clone)]
pub enum ProfileExistence {
    Absent,
    Exists(Box<CheckProfileResponse>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub wallet_address: String,
    pub storj_url: String,
    pub legal_name_hash: String,
    pub nickname: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debug_events: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonUploadRequest {
    pub filename: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonUploadResponse {
    pub success: bool,
    pub file_url: String,
    pub filename: String,
    pub size: usize,
    pub data_hash: String,
    pub uploaded_at: String,
}
