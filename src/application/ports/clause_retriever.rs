use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Clause;
use crate::domain::value_objects::ClauseCategory;

#[derive(Debug)]
pub enum RetrievalError {
    IndexNotAvailable(Uuid),
    EmbeddingError(String),
    StorageError(String),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::IndexNotAvailable(id) => {
                write!(f, "No retrieval index for document {}", id)
            }
            RetrievalError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            RetrievalError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// A clause returned by semantic lookup, ranked by vector similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedClause {
    pub clause_no: i32,
    pub category: ClauseCategory,
    pub text: String,
    pub similarity: f32,
}

/// The one capability interface every retrieval backend implements; callers
/// never probe for alternative method shapes. Indexing overwrites any
/// previous index for the document.
#[async_trait]
pub trait ClauseRetriever: Send + Sync {
    async fn index_document(
        &self,
        document_id: Uuid,
        clauses: &[Clause],
    ) -> Result<(), RetrievalError>;

    /// Top-k most similar clauses. Fails with `IndexNotAvailable` when the
    /// document has no index; best-effort callers use `retrieve_or_empty`.
    async fn retrieve(
        &self,
        document_id: Uuid,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedClause>, RetrievalError>;

    /// Degraded-mode lookup for callers where retrieval is an enhancement,
    /// not a requirement.
    async fn retrieve_or_empty(
        &self,
        document_id: Uuid,
        query: &str,
        k: usize,
    ) -> Vec<RetrievedClause> {
        match self.retrieve(document_id, query, k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    "Retrieval unavailable for document {}, continuing without context: {}",
                    document_id,
                    e
                );
                Vec::new()
            }
        }
    }
}
