// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Boundary API Client
//!
//! HTTP client side of the verification/storage boundary. Every call
//! carries a finite timeout (30 s by default); only the signing wait is
//! user-paced. Boundary rejection reasons are passed through verbatim,
//! mapped onto the closed taxonomy where the reason is recognizable.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::ProfileError;
use crate::profile::types::{
    CheckProfileRequest, CheckProfileResponse, CreateProfileRequest, CreateProfileResponse,
    JsonUploadRequest, JsonUploadResponse, ProfileExistence, UploadResponse,
};

/// Client-side boundary seam; mocked in orchestrator tests.
#[async_trait]
pub trait BoundaryClient: Send + Sync {
    async fn check_profile(&self, wallet_address: &str) -> Result<ProfileExistence, ProfileError>;

    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        filename: &str,
    ) -> Result<UploadResponse, ProfileError>;

    async fn upload_profile_json(
        &self,
        filename: &str,
        data: &Value,
    ) -> Result<JsonUploadResponse, ProfileError>;

    async fn create_profile(
        &self,
        request: &CreateProfileRequest,
    ) -> Result<CreateProfileResponse, ProfileError>;
}

pub struct HttpBoundaryClient {
    client: Client,
    base_url: String,
}

impl HttpBoundaryClient {
    pub fn new(base_url: &str) -> Result<Self, ProfileError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProfileError::Boundary(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_transport(e: reqwest::Error) -> ProfileError {
        if e.is_timeout() {
            ProfileError::Timeout
        } else {
            ProfileError::Boundary(e.to_string())
        }
    }

    /// Map a boundary error body onto the taxonomy, keeping the original
    /// reason text.
    fn map_rejection(reason: String) -> ProfileError {
        let lower = reason.to_lowercase();
        if lower.contains("profile already exists") {
            ProfileError::ProfileAlreadyExists
        } else if lower.contains("nickname") && lower.contains("taken") {
            ProfileError::NicknameTaken
        } else {
            ProfileError::Boundary(reason)
        }
    }

    async fn error_reason(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<Value>().await {
            Ok(body) => body["error"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("boundary returned {}", status)),
            Err(_) => format!("boundary returned {}", status),
        }
    }
}

#[async_trait]
impl BoundaryClient for HttpBoundaryClient {
    async fn check_profile(&self, wallet_address: &str) -> Result<ProfileExistence, ProfileError> {
        let url = format!("{}/api/profile/check", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CheckProfileRequest {
                wallet_address: wallet_address.to_string(),
            })
            .send()
            .await
            .map_err(Self::map_transport)?;

        if response.status().as_u16() == 503 {
            let reason = Self::error_reason(response).await;
            return Err(ProfileError::ExistenceUnknown(reason));
        }
        if !response.status().is_success() {
            let reason = Self::error_reason(response).await;
            return Err(ProfileError::Boundary(reason));
        }

        let body: CheckProfileResponse = response.json().await.map_err(Self::map_transport)?;
        if body.exists {
            Ok(ProfileExistence::Exists(Box::new(body)))
        } else {
            Ok(ProfileExistence::Absent)
        }
    }

    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        filename: &str,
    ) -> Result<UploadResponse, ProfileError> {
        let url = format!("{}/api/storj/upload", self.base_url);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| ProfileError::StorageUploadFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("profileImage", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProfileError::Timeout
                } else {
                    ProfileError::StorageUploadFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let reason = Self::error_reason(response).await;
            return Err(ProfileError::StorageUploadFailed(reason));
        }

        response
            .json()
            .await
            .map_err(|e| ProfileError::StorageUploadFailed(e.to_string()))
    }

    async fn upload_profile_json(
        &self,
        filename: &str,
        data: &Value,
    ) -> Result<JsonUploadResponse, ProfileError> {
        let url = format!("{}/api/storj/upload-json", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&JsonUploadRequest {
                filename: filename.to_string(),
                data: data.clone(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProfileError::Timeout
                } else {
                    ProfileError::StorageUploadFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let reason = Self::error_reason(response).await;
            return Err(ProfileError::StorageUploadFailed(reason));
        }

        response
            .json()
            .await
            .map_err(|e| ProfileError::StorageUploadFailed(e.to_string()))
    }

    async fn create_profile(
        &self,
        request: &CreateProfileRequest,
    ) -> Result<CreateProfileResponse, ProfileError> {
        let url = format!("{}/api/profile/create", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Self::map_transport)?;

        if !response.status().is_success() {
            let reason = Self::error_reason(response).await;
            return Err(Self::map_rejection(reason));
        }

        response.json().await.map_err(Self::map_transport)
    }
}
