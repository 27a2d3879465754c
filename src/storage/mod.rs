pub mod storj_client;

// Re-export main types for convenience
pub use storj_client::{
    content_type_for_key, download_url, locator_for, parse_locator, store_profile_image,
    store_profile_json, GatewayStorjBackend, JsonUploadReceipt, MockStorjBackend, StorageError,
    StorjConfig, StorjStorage, UploadReceipt, ALLOWED_IMAGE_TYPES, LOCATOR_SCHEME,
    MAX_IMAGE_BYTES, MAX_PROFILE_JSON_BYTES,
};
