use async_trait::async_trait;

#[derive(Debug)]
pub enum FileStorageError {
    WriteFailed(String),
    ReadFailed(String),
}

impl std::fmt::Display for FileStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStorageError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
            FileStorageError::ReadFailed(msg) => write!(f, "Read failed: {}", msg),
        }
    }
}

impl std::error::Error for FileStorageError {}

/// Raw document byte storage. The pipeline only ever needs the stored path
/// back; extraction reads from disk itself.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store bytes under a collision-safe name; returns the stored path.
    async fn store(&self, file_name: &str, data: &[u8]) -> Result<String, FileStorageError>;
}
