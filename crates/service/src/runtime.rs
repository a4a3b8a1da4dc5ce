//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the binary can prepare the upload
//! directory through `service::runtime::ensure_env` without importing `common`.

/// Ensure the document upload directory exists and is a directory.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(upload_dir).await
}
