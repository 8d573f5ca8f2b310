use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::AnalysisJob;

#[derive(Debug)]
pub enum JobRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for JobRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobRepositoryError::NotFound(id) => write!(f, "Analysis job not found: {}", id),
            JobRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            JobRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for JobRepositoryError {}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError>;
    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<AnalysisJob>, JobRepositoryError>;
    async fn find_by_document_id(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<AnalysisJob>, JobRepositoryError>;
    async fn find_active_jobs(&self) -> Result<Vec<AnalysisJob>, JobRepositoryError>;
    async fn update(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError>;
}
