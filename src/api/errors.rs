// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProfileError;
use crate::storage::StorageError;

/// Wire shape of every boundary failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_events: Option<Vec<String>>,
}

/// Boundary-side error: the closed profile taxonomy plus transport-level
/// request failures. HTTP status mapping happens here, once.
#[derive(Debug, Clone)]
pub enum ApiError {
    Profile(ProfileError),
    Storage(StorageError),
    InvalidRequest(String),
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Profile(e) => match e {
                ProfileError::Validation(_)
                | ProfileError::ProfileAlreadyExists
                | ProfileError::NicknameTaken => 400,
                ProfileError::MalformedSignature(_) | ProfileError::SignatureInvalid { .. } => 401,
                ProfileError::ExistenceUnknown(_) => 503,
                ProfileError::Timeout => 504,
                _ => 500,
            },
            ApiError::Storage(e) => match e {
                StorageError::InvalidPath(_)
                | StorageError::PayloadTooLarge { .. }
                | StorageError::UnsupportedMediaType => 400,
                StorageError::NotFound(_) => 404,
                StorageError::Timeout => 504,
                _ => 500,
            },
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::InternalError(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            debug_events: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Profile(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        ApiError::Profile(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::response::Json(self.to_response())).into_response()
    }
}
