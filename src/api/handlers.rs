// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Boundary API Handlers
//!
//! The HTTP surface of the verification/storage boundary. The create
//! handler validates in a fixed order (address → locator → hash →
//! presence → nickname bounds → signature → existence) so a request fails
//! on the earliest broken field, and only verified requests ever reach the
//! registry.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::errors::ApiError;
use crate::error::ProfileError;
use crate::profile::types::{
    CheckProfileRequest, CheckProfileResponse, CreateProfileRequest, CreateProfileResponse,
    JsonUploadRequest, JsonUploadResponse, ProfileDocument, ProfileInfo, UploadResponse,
};
use crate::profile::verifier::{validate_address, validate_nickname, verify_create_profile};
use crate::registry::RegistryClientTrait;
use crate::storage::{
    content_type_for_key, download_url, parse_locator, store_profile_image, store_profile_json,
    StorjStorage, LOCATOR_SCHEME,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorjStorage>,
    pub registry: Arc<dyn RegistryClientTrait>,
    /// Public base URL used when rewriting locators to download links.
    pub base_url: String,
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Load the stored profile document for an on-chain record, rewriting the
/// picture locator to a URL the browser can fetch. A store failure is
/// reported alongside the profile, not as a failed check.
async fn load_document(
    state: &AppState,
    storj_profile_url: &str,
) -> (Option<ProfileDocument>, Option<String>) {
    if storj_profile_url.is_empty() {
        return (None, None);
    }

    let key = match parse_locator(storj_profile_url) {
        Ok((_, key)) => key.to_string(),
        Err(e) => return (None, Some(e.to_string())),
    };

    let bytes = match state.store.get(&key).await {
        Ok(bytes) => bytes,
        Err(e) => return (None, Some(e.to_string())),
    };

    match serde_json::from_slice::<ProfileDocument>(&bytes) {
        Ok(mut document) => {
            if document.profile_picture.starts_with(LOCATOR_SCHEME) {
                document.profile_picture =
                    download_url(&state.base_url, &document.profile_picture);
            }
            (Some(document), None)
        }
        Err(e) => (None, Some(format!("invalid profile document: {}", e))),
    }
}

async fn profile_info(state: &AppState, address: &str) -> Result<CheckProfileResponse, ApiError> {
    let onchain = state.registry.get_profile(address).await?;
    let (document, storj_error) = load_document(state, &onchain.storj_profile_url).await;

    Ok(CheckProfileResponse {
        exists: true,
        profile_data: Some(ProfileInfo {
            wallet_address: address.to_string(),
            storj_profile_url: onchain.storj_profile_url,
            legal_name_hash: onchain.legal_name_hash,
            legal_name_changed: onchain.legal_name_changed,
            created_at: onchain.created_at.to_string(),
            nonce: onchain.nonce.to_string(),
            document,
        }),
        storj_error,
    })
}

/// `POST /api/profile/check`
///
/// A registry read failure is a 503, never `exists: false` — confirmed
/// absence and "unknown due to outage" stay distinguishable.
pub async fn check_profile_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckProfileRequest>,
) -> Result<Json<CheckProfileResponse>, ApiError> {
    validate_address(&request.wallet_address)?;

    info!("🔍 Checking profile for {}", request.wallet_address);

    if !state.registry.profile_exists(&request.wallet_address).await? {
        return Ok(Json(CheckProfileResponse {
            exists: false,
            profile_data: None,
            storj_error: None,
        }));
    }

    Ok(Json(profile_info(&state, &request.wallet_address).await?))
}

/// `GET /api/profile/:address`
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CheckProfileResponse>, ApiError> {
    validate_address(&address)?;

    if !state.registry.profile_exists(&address).await? {
        return Err(ApiError::NotFound(format!("no profile for {}", address)));
    }

    Ok(Json(profile_info(&state, &address).await?))
}

/// `POST /api/profile/create`
pub async fn create_profile_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<Json<CreateProfileResponse>, ApiError> {
    let mut debug_events = Vec::new();

    info!(
        "📥 Profile creation request for {} (nickname {})",
        request.wallet_address, request.nickname
    );

    // Fixed validation order; the earliest broken field wins
    validate_address(&request.wallet_address)?;

    if !request.storj_url.starts_with(LOCATOR_SCHEME) {
        return Err(ProfileError::Validation("Invalid Storj URL".to_string()).into());
    }

    if !crate::crypto::is_commitment_hash(&request.legal_name_hash) {
        return Err(ProfileError::Validation(
            "Invalid legal name hash format. Must be 32 bytes hex string.".to_string(),
        )
        .into());
    }

    if request.nickname.is_empty() || request.signature.is_empty() {
        return Err(ProfileError::Validation("Missing required fields".to_string()).into());
    }

    validate_nickname(&request.nickname)?;

    // Reconstruct the canonical message from the discrete fields and
    // recover the signer; the client's own message string is never trusted
    let recovered = verify_create_profile(
        &request.wallet_address,
        &request.storj_url,
        &request.legal_name_hash,
        &request.nickname,
        &request.signature,
    )?;
    debug_events.push(format!("signature verified, recovered {}", recovered));

    // Existence gate: the single-writer check for this identity
    if state.registry.profile_exists(&request.wallet_address).await? {
        warn!("Profile already exists for {}", request.wallet_address);
        return Err(ProfileError::ProfileAlreadyExists.into());
    }
    debug_events.push("existence check passed".to_string());

    let receipt = state
        .registry
        .create_profile(
            &request.wallet_address,
            &request.storj_url,
            &request.legal_name_hash,
            &request.nickname,
            &request.signature,
        )
        .await?;
    debug_events.push(format!("transaction mined: {}", receipt.transaction_hash));

    Ok(Json(CreateProfileResponse {
        success: true,
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        debug_events,
    }))
}

/// `POST /api/storj/upload` — multipart profile image upload.
pub async fn upload_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("profileImage") {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidRequest("missing content type".to_string()))?;
        let filename = field.file_name().unwrap_or("upload.jpg").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("failed to read file: {}", e)))?
            .to_vec();

        info!(
            "📁 Image upload: {} ({} bytes, {})",
            filename,
            data.len(),
            mime_type
        );

        let receipt = store_profile_image(state.store.as_ref(), data, &mime_type, &filename).await?;

        return Ok(Json(UploadResponse {
            success: true,
            file_url: receipt.file_url,
            filename: receipt.filename,
            size: receipt.size,
            mime_type: receipt.mime_type,
        }));
    }

    Err(ApiError::InvalidRequest("No file provided".to_string()))
}

/// `POST /api/storj/upload-json` — profile document upload.
pub async fn upload_json_handler(
    State(state): State<AppState>,
    Json(request): Json<JsonUploadRequest>,
) -> Result<Json<JsonUploadResponse>, ApiError> {
    if request.filename.is_empty() || request.data.is_null() {
        return Err(ApiError::InvalidRequest(
            "Filename and data are required".to_string(),
        ));
    }

    info!("📁 JSON upload: {}", request.filename);

    let receipt = store_profile_json(state.store.as_ref(), &request.filename, &request.data).await?;

    Ok(Json(JsonUploadResponse {
        success: true,
        file_url: receipt.file_url,
        filename: receipt.filename,
        size: receipt.size,
        data_hash: receipt.data_hash,
        uploaded_at: receipt.uploaded_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub file: String,
}

/// `GET /api/storj/download?file=<path>` — raw object passthrough with
/// content type inferred from the key extension.
pub async fn download_handler(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let bytes = state.store.get(&query.file).await?;
    let content_type = content_type_for_key(&query.file);

    if content_type == "application/json" {
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InternalError(format!("stored JSON is invalid: {}", e)))?;
        return Ok(Json(value).into_response());
    }

    let mut response = (
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    )
        .into_response();

    if content_type.starts_with("image/") {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("public, max-age=86400"),
        );
    }

    Ok(response)
}
