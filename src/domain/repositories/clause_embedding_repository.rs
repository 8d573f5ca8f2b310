use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::value_objects::ClauseCategory;

#[derive(Debug)]
pub enum ClauseEmbeddingRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ClauseEmbeddingRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseEmbeddingRepositoryError::DatabaseError(msg) => {
                write!(f, "Database error: {}", msg)
            }
            ClauseEmbeddingRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ClauseEmbeddingRepositoryError {}

/// One indexed clause: its text, vector, and the metadata needed to cite it.
#[derive(Debug, Clone)]
pub struct ClauseEmbedding {
    pub id: Uuid,
    pub document_id: Uuid,
    pub clause_no: i32,
    pub category: ClauseCategory,
    pub clause_text: String,
    pub embedding: Vector,
}

impl ClauseEmbedding {
    pub fn new(
        document_id: Uuid,
        clause_no: i32,
        category: ClauseCategory,
        clause_text: String,
        embedding: Vector,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            clause_no,
            category,
            clause_text,
            embedding,
        }
    }
}

/// Per-document vector store over clauses. `replace_for_document` implements
/// the rebuild-overwrites-in-place policy; there is no versioning.
#[async_trait]
pub trait ClauseEmbeddingRepository: Send + Sync {
    async fn replace_for_document(
        &self,
        document_id: Uuid,
        embeddings: &[ClauseEmbedding],
    ) -> Result<(), ClauseEmbeddingRepositoryError>;

    async fn find_by_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<ClauseEmbedding>, ClauseEmbeddingRepositoryError>;

    async fn count_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<i64, ClauseEmbeddingRepositoryError>;
}
