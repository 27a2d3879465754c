// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Opaque-store behavior through the `StorjStorage` trait: upload helpers,
//! size caps, locator handling, and injected-failure propagation.

use serde_json::json;

use sonic_profile_node::storage::{
    download_url, locator_for, parse_locator, store_profile_image, store_profile_json,
    MockStorjBackend, StorageError, StorjStorage, MAX_PROFILE_JSON_BYTES,
};

#[tokio::test]
async fn test_image_upload_stores_under_content_address() {
    let store = MockStorjBackend::new();
    let data = vec![0x89, 0x50, 0x4e, 0x47, 1, 2, 3];

    let receipt = store_profile_image(&store, data.clone(), "image/png", "avatar.png")
        .await
        .unwrap();

    let (bucket, key) = parse_locator(&receipt.file_url).unwrap();
    assert_eq!(bucket, store.bucket());
    assert_eq!(key, receipt.filename);
    assert_eq!(store.get(key).await.unwrap(), data);
    assert_eq!(
        store.content_type_of(key).await.as_deref(),
        Some("image/png")
    );
}

#[tokio::test]
async fn test_every_allowed_image_type_accepted() {
    let store = MockStorjBackend::new();
    for (mime, name) in [
        ("image/jpeg", "a.jpg"),
        ("image/png", "b.png"),
        ("image/webp", "c.webp"),
        ("image/gif", "d.gif"),
    ] {
        let receipt = store_profile_image(&store, vec![1, 2, 3, 4], mime, name)
            .await
            .unwrap();
        assert_eq!(receipt.mime_type, mime);
    }
}

#[tokio::test]
async fn test_json_cap_enforced_at_serialized_size() {
    let store = MockStorjBackend::new();

    // A bio that serializes past the 1 MB cap
    let oversized = json!({ "bio": "x".repeat(MAX_PROFILE_JSON_BYTES + 1) });
    let err = store_profile_json(&store, "profiles/0xabc/profile.json", &oversized)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PayloadTooLarge { .. }));

    // Nothing was written
    assert!(!store.exists("profiles/0xabc/profile.json").await.unwrap());
}

#[tokio::test]
async fn test_json_overwrite_keeps_latest_document() {
    let store = MockStorjBackend::new();
    let filename = "profiles/0xabc/profile.json";

    store_profile_json(&store, filename, &json!({ "nickname": "alice123" }))
        .await
        .unwrap();
    let second = store_profile_json(&store, filename, &json!({ "nickname": "alice456" }))
        .await
        .unwrap();

    let stored = store.get(filename).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(parsed["nickname"], "alice456");
    assert_eq!(second.data_hash.len(), 64);
}

#[tokio::test]
async fn test_injected_failure_propagates_through_helpers() {
    let store = MockStorjBackend::new();
    store
        .inject_error(StorageError::NetworkError("gateway down".to_string()))
        .await;

    let err = store_profile_json(&store, "profiles/0xabc/profile.json", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::NetworkError("gateway down".to_string()));

    // The injection is one-shot; the next upload goes through
    store_profile_json(&store, "profiles/0xabc/profile.json", &json!({}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timeout_error_stays_distinct() {
    let store = MockStorjBackend::new();
    store.inject_error(StorageError::Timeout).await;

    let err = store
        .get("profiles/0xabc/profile.json")
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::Timeout);
}

#[test]
fn test_locator_and_download_url_agree_on_keys() {
    let locator = locator_for("sonic-profile", "profile-pictures/ab12.png");
    let url = download_url("http://localhost:3000", &locator);
    assert_eq!(
        url,
        "http://localhost:3000/api/storj/download?file=profile-pictures/ab12.png"
    );

    // The rewritten URL carries the same key the locator parses to
    let (_, key) = parse_locator(&locator).unwrap();
    assert!(url.ends_with(key));
}
