use std::io::Cursor;
use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::domain::value_objects::ContentHash;
use crate::domain::value_objects::content_hash::HASH_CHUNK_SIZE;

#[derive(Debug)]
pub enum UploadDocumentError {
    UnsupportedFormat(String),
    EmptyFile,
    StorageError(String),
    RepositoryError(String),
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::UnsupportedFormat(name) => {
                write!(f, "Unsupported format, expected a PDF: {}", name)
            }
            UploadDocumentError::EmptyFile => write!(f, "Uploaded file is empty"),
            UploadDocumentError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UploadDocumentError {}

impl From<DocumentRepositoryError> for UploadDocumentError {
    fn from(error: DocumentRepositoryError) -> Self {
        UploadDocumentError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document_id: Uuid,
    pub content_hash: String,
    /// True when byte-identical content was already stored and the existing
    /// document was returned instead of a new one.
    pub already_existed: bool,
}

/// Stores an uploaded contract and registers it, deduplicating byte-identical
/// re-uploads by content hash.
pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
        }
    }

    pub async fn execute(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(UploadDocumentError::UnsupportedFormat(file_name.to_string()));
        }
        if data.is_empty() {
            return Err(UploadDocumentError::EmptyFile);
        }

        let content_hash = ContentHash::from_reader(&mut Cursor::new(data), HASH_CHUNK_SIZE)
            .map_err(|e| UploadDocumentError::StorageError(e.to_string()))?;

        if let Some(existing) = self.document_repository.find_by_hash(&content_hash).await? {
            tracing::info!(
                "Upload of {} matched existing document {} by content hash",
                file_name,
                existing.id()
            );
            return Ok(UploadDocumentResponse {
                document_id: existing.id(),
                content_hash: content_hash.to_string(),
                already_existed: true,
            });
        }

        let file_path = self
            .file_storage
            .store(file_name, data)
            .await
            .map_err(|e| UploadDocumentError::StorageError(e.to_string()))?;

        let document = Document::new(
            file_name.to_string(),
            file_path,
            data.len() as i64,
            content_hash.clone(),
        );
        self.document_repository.save(&document).await?;

        Ok(UploadDocumentResponse {
            document_id: document.id(),
            content_hash: content_hash.to_string(),
            already_existed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::application::ports::file_storage::FileStorageError;

    #[derive(Default)]
    struct InMemoryDocuments {
        rows: Mutex<HashMap<Uuid, Document>>,
    }

    #[async_trait]
    impl DocumentRepository for InMemoryDocuments {
        async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(document.id(), document.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_hash(
            &self,
            hash: &ContentHash,
        ) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|d| d.content_hash().matches(hash))
                .cloned())
        }

        async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.save(document).await
        }

        async fn list(&self, _limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }
    }

    struct StubStorage;

    #[async_trait]
    impl FileStorage for StubStorage {
        async fn store(&self, file_name: &str, _data: &[u8]) -> Result<String, FileStorageError> {
            Ok(format!("/uploads/{}", file_name))
        }
    }

    fn use_case() -> UploadDocumentUseCase {
        UploadDocumentUseCase::new(Arc::new(InMemoryDocuments::default()), Arc::new(StubStorage))
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let result = use_case().execute("notes.txt", b"content").await;
        assert!(matches!(result, Err(UploadDocumentError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_file() {
        let result = use_case().execute("contract.pdf", b"").await;
        assert!(matches!(result, Err(UploadDocumentError::EmptyFile)));
    }

    #[tokio::test]
    async fn test_identical_bytes_reuse_existing_document() {
        let use_case = use_case();

        let first = use_case.execute("contract.pdf", b"pdf bytes").await.unwrap();
        assert!(!first.already_existed);

        let second = use_case.execute("renamed.pdf", b"pdf bytes").await.unwrap();
        assert!(second.already_existed);
        assert_eq!(first.document_id, second.document_id);
        assert_eq!(first.content_hash, second.content_hash);
    }

    #[tokio::test]
    async fn test_different_bytes_create_distinct_documents() {
        let use_case = use_case();

        let first = use_case.execute("a.pdf", b"version one").await.unwrap();
        let second = use_case.execute("a.pdf", b"version two").await.unwrap();

        assert_ne!(first.document_id, second.document_id);
        assert_ne!(first.content_hash, second.content_hash);
    }
}
