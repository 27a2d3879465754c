// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    check_profile_handler, create_profile_handler, download_handler, get_profile_handler,
    health_handler, upload_image_handler, upload_json_handler, AppState,
};
use crate::storage::MAX_IMAGE_BYTES;

/// Assemble the boundary router. Separated from [`start_server`] so tests
/// can drive the router without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Profile endpoints
        .route("/api/profile/check", post(check_profile_handler))
        .route("/api/profile/create", post(create_profile_handler))
        .route("/api/profile/:address", get(get_profile_handler))
        // Opaque-store endpoints
        .route(
            "/api/storj/upload",
            post(upload_image_handler)
                // multipart framing overhead on top of the image cap
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route("/api/storj/upload-json", post(upload_json_handler))
        .route("/api/storj/download", get(download_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
