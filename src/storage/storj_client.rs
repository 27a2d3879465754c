// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Storj Object Store Client
//!
//! The opaque content store behind profile media and profile JSON
//! documents. Objects are addressed by `storj://<bucket>/<key>` locators;
//! orphaned uploads are harmless, so failed creation attempts never clean
//! up after themselves.
//!
//! Two backends implement the same trait: an in-memory mock with error
//! injection for tests, and an S3-gateway backend speaking plain HTTP.

use async_trait::async_trait;
use reqwest;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Locator scheme for stored objects.
pub const LOCATOR_SCHEME: &str = "storj://";

/// Size cap for profile images (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Size cap for profile JSON documents (1 MB).
pub const MAX_PROFILE_JSON_BYTES: usize = 1024 * 1024;

/// MIME types accepted for profile images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Payload too large: limit {limit} bytes, got {size}")]
    PayloadTooLarge { limit: usize, size: usize },
    #[error("Invalid file type. Only JPEG, PNG, WebP, and GIF are allowed.")]
    UnsupportedMediaType,
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("Request timed out")]
    Timeout,
}

#[derive(Debug, Clone)]
pub struct StorjConfig {
    pub gateway_url: String,
    pub bucket: String,
    pub timeout: Duration,
}

impl Default for StorjConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://gateway.storjshare.io".to_string(),
            bucket: "sonic-profile".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Object store boundary. Keys are bucket-relative paths; locators add the
/// scheme and bucket.
#[async_trait]
pub trait StorjStorage: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
    fn bucket(&self) -> &str;

    // Mock-specific method (no-op for the gateway backend)
    async fn inject_error(&self, _error: StorageError) {}
}

/// Build a `storj://<bucket>/<key>` locator.
pub fn locator_for(bucket: &str, key: &str) -> String {
    format!("{}{}/{}", LOCATOR_SCHEME, bucket, key)
}

/// Split a locator into (bucket, key).
pub fn parse_locator(locator: &str) -> Result<(&str, &str), StorageError> {
    let rest = locator
        .strip_prefix(LOCATOR_SCHEME)
        .ok_or_else(|| StorageError::InvalidPath(format!("not a storj locator: {}", locator)))?;
    rest.split_once('/')
        .filter(|(bucket, key)| !bucket.is_empty() && !key.is_empty())
        .ok_or_else(|| StorageError::InvalidPath(format!("locator missing key: {}", locator)))
}

/// Rewrite a `storj://` locator to a boundary download URL the browser can
/// fetch directly. Non-locator inputs pass through unchanged.
pub fn download_url(base_url: &str, locator: &str) -> String {
    match parse_locator(locator) {
        Ok((_, key)) => format!("{}/api/storj/download?file={}", base_url, key),
        Err(_) => locator.to_string(),
    }
}

/// Infer a response content type from a key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let lower = key.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".svg") {
        "image/svg+xml"
    } else if lower.ends_with(".json") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidPath("Empty key".to_string()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidPath(
            "Key cannot start with /".to_string(),
        ));
    }
    if key.contains("../") {
        return Err(StorageError::InvalidPath(
            "Path traversal not allowed".to_string(),
        ));
    }
    Ok(())
}

/// Receipt for a stored binary object.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub file_url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

/// Receipt for a stored profile JSON document.
#[derive(Debug, Clone)]
pub struct JsonUploadReceipt {
    pub file_url: String,
    pub filename: String,
    pub size: usize,
    pub data_hash: String,
    pub uploaded_at: String,
}

/// Store a profile image under a content-addressed key.
///
/// Enforces the 5 MB cap and the image MIME allowlist, then keys the object
/// as `profile-pictures/<sha256-prefix>.<ext>` so identical uploads land on
/// the same key.
pub async fn store_profile_image(
    store: &dyn StorjStorage,
    data: Vec<u8>,
    mime_type: &str,
    original_name: &str,
) -> Result<UploadReceipt, StorageError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(StorageError::UnsupportedMediaType);
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(StorageError::PayloadTooLarge {
            limit: MAX_IMAGE_BYTES,
            size: data.len(),
        });
    }

    let content_hash = hex::encode(Sha256::digest(&data));
    let extension = original_name.rsplit('.').next().unwrap_or("jpg");
    let filename = format!("profile-pictures/{}.{}", &content_hash[..32], extension);

    store.put(&filename, data.clone(), mime_type).await?;

    Ok(UploadReceipt {
        file_url: locator_for(store.bucket(), &filename),
        filename,
        size: data.len(),
        mime_type: mime_type.to_string(),
    })
}

/// Store a profile JSON document.
///
/// The filename must match `profiles/<walletAddress>/profile.json`; the
/// document is pretty-printed, capped at 1 MB, and hashed for integrity
/// verification.
pub async fn store_profile_json(
    store: &dyn StorjStorage,
    filename: &str,
    data: &Value,
) -> Result<JsonUploadReceipt, StorageError> {
    if !filename.starts_with("profiles/") || !filename.ends_with(".json") {
        return Err(StorageError::InvalidPath(
            "Filename must be in format: profiles/{walletAddress}/profile.json".to_string(),
        ));
    }

    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| StorageError::ServerError(format!("serialize failed: {}", e)))?;
    let buffer = json_data.into_bytes();

    if buffer.len() > MAX_PROFILE_JSON_BYTES {
        return Err(StorageError::PayloadTooLarge {
            limit: MAX_PROFILE_JSON_BYTES,
            size: buffer.len(),
        });
    }

    let data_hash = hex::encode(Sha256::digest(&buffer));
    let size = buffer.len();

    store.put(filename, buffer, "application/json").await?;

    Ok(JsonUploadReceipt {
        file_url: locator_for(store.bucket(), filename),
        filename: filename.to_string(),
        size,
        data_hash,
        uploaded_at: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug)]
struct MockEntry {
    data: Vec<u8>,
    content_type: String,
}

/// In-memory backend for tests. Supports one-shot error injection for
/// failure-path tests.
#[derive(Debug)]
pub struct MockStorjBackend {
    entries: Arc<Mutex<HashMap<String, MockEntry>>>,
    injected_error: Arc<Mutex<Option<StorageError>>>,
    bucket: String,
}

impl MockStorjBackend {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            injected_error: Arc::new(Mutex::new(None)),
            bucket: "sonic-profile".to_string(),
        }
    }

    async fn check_injected_error(&self) -> Result<(), StorageError> {
        let mut error_opt = self.injected_error.lock().await;
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }

    pub async fn content_type_of(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|e| e.content_type.clone())
    }
}

#[async_trait]
impl StorjStorage for MockStorjBackend {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.check_injected_error().await?;
        validate_key(key)?;

        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            MockEntry {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.check_injected_error().await?;
        validate_key(key)?;

        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|e| e.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.check_injected_error().await?;
        let entries = self.entries.lock().await;
        Ok(entries.contains_key(key))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn inject_error(&self, error: StorageError) {
        let mut error_opt = self.injected_error.lock().await;
        *error_opt = Some(error);
    }
}

/// S3-gateway backend. Objects live at `{gateway}/{bucket}/{key}`.
pub struct GatewayStorjBackend {
    client: reqwest::Client,
    gateway_url: String,
    bucket: String,
}

impl GatewayStorjBackend {
    pub fn new(config: &StorjConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.gateway_url, self.bucket, key)
    }

    fn map_error(e: reqwest::Error) -> StorageError {
        if e.is_timeout() {
            StorageError::Timeout
        } else {
            StorageError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl StorjStorage for GatewayStorjBackend {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(key)?;

        let response = self
            .client
            .put(self.object_url(key))
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(Self::map_error)?;

        match response.status().as_u16() {
            200 | 201 | 204 => Ok(()),
            401 | 403 => Err(StorageError::AuthError(format!(
                "gateway rejected credentials for {}",
                key
            ))),
            status => Err(StorageError::ServerError(format!(
                "gateway returned {} for {}",
                status, key
            ))),
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;

        let response = self
            .client
            .get(self.object_url(key))
            .send()
            .await
            .map_err(Self::map_error)?;

        match response.status().as_u16() {
            200 => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(Self::map_error),
            404 => Err(StorageError::NotFound(key.to_string())),
            401 | 403 => Err(StorageError::AuthError(format!(
                "gateway rejected credentials for {}",
                key
            ))),
            status => Err(StorageError::ServerError(format!(
                "gateway returned {} for {}",
                status, key
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;

        let response = self
            .client
            .head(self.object_url(key))
            .send()
            .await
            .map_err(Self::map_error)?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::ServerError(format!(
                "gateway returned {} for {}",
                status, key
            ))),
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
