//! Document file storage.
//!
//! Handlers only see the `DocumentStorage` trait; the binary wires the local
//! filesystem backend rooted at the configured upload directory.

use async_trait::async_trait;
use thiserror::Error;

pub mod local;

pub use local::LocalDocumentStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid file name: {0}")]
    InvalidName(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self { StorageError::Io(e.to_string()) }
}

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Persist `bytes` under a fresh unique name derived from `file_name` and
    /// return the stored path.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), StorageError>;
}
