use async_trait::async_trait;

use crate::domain::entities::Clause;
use crate::domain::value_objects::ContentHash;

#[derive(Debug)]
pub enum ClauseCacheError {
    DatabaseError(String),
    SerializationError(String),
}

impl std::fmt::Display for ClauseCacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseCacheError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ClauseCacheError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ClauseCacheError {}

/// Content-addressed cache of segmentation + classification results.
/// `put` is an upsert: the last write for a hash wins, and entries never
/// expire on their own.
#[async_trait]
pub trait ClauseCacheRepository: Send + Sync {
    async fn get(&self, hash: &ContentHash) -> Result<Option<Vec<Clause>>, ClauseCacheError>;
    async fn put(&self, hash: &ContentHash, clauses: &[Clause]) -> Result<(), ClauseCacheError>;
}
