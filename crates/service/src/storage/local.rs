use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{DocumentStorage, StorageError};

/// Files live flat inside `root` as `<hex>_<original name>`.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }
}

/// Strip any directory components a client may have sent.
fn base_name(file_name: &str) -> Result<&str, StorageError> {
    let normalized = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    match Path::new(normalized).file_name().and_then(|n| n.to_str()) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(StorageError::InvalidName(file_name.to_string())),
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let name = base_name(file_name)?;
        fs::create_dir_all(&self.root).await?;

        let target = self.root.join(format!("{}_{}", uuid::Uuid::new_v4().simple(), name));
        let tmp = target.with_extension("part");
        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %target.display(), size = bytes.len(), "document_stored");
        Ok(target.to_string_lossy().into_owned())
    }

    async fn remove(&self, path: &str) -> Result<(), StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
