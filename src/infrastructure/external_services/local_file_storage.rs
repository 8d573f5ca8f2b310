use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError};

/// Stores uploaded documents on the local filesystem under a base directory,
/// prefixing names with a UUID so identically named uploads never collide.
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn from_env() -> Self {
        let base_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
        Self::new(base_dir)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file_name: &str, data: &[u8]) -> Result<String, FileStorageError> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| FileStorageError::WriteFailed(e.to_string()))?;

        // Keep only the final path component of whatever the client sent.
        let safe_name = std::path::Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.pdf");

        let path = self.base_dir.join(format!("{}_{}", Uuid::new_v4(), safe_name));

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| FileStorageError::WriteFailed(e.to_string()))?;

        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_bytes_and_sanitizes_name() {
        let base = std::env::temp_dir().join(format!("clauselens-test-{}", Uuid::new_v4()));
        let storage = LocalFileStorage::new(base.clone());

        let path = storage
            .store("../../etc/contract.pdf", b"pdf bytes")
            .await
            .unwrap();

        assert!(path.starts_with(base.to_str().unwrap()));
        assert!(path.ends_with("contract.pdf"));

        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"pdf bytes");

        tokio::fs::remove_dir_all(&base).await.unwrap();
    }
}
