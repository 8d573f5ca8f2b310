use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::AnalysisJob;
use crate::domain::repositories::{JobRepository, job_repository::JobRepositoryError};

#[derive(Debug)]
pub enum GetJobStatusError {
    JobNotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for GetJobStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetJobStatusError::JobNotFound(id) => write!(f, "Analysis job not found: {}", id),
            GetJobStatusError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetJobStatusError {}

impl From<JobRepositoryError> for GetJobStatusError {
    fn from(error: JobRepositoryError) -> Self {
        GetJobStatusError::RepositoryError(error.to_string())
    }
}

/// Polling access to the full job record; the background worker owns all
/// state transitions.
pub struct GetJobStatusUseCase {
    job_repository: Arc<dyn JobRepository>,
}

impl GetJobStatusUseCase {
    pub fn new(job_repository: Arc<dyn JobRepository>) -> Self {
        Self { job_repository }
    }

    pub async fn execute(&self, job_id: Uuid) -> Result<AnalysisJob, GetJobStatusError> {
        self.job_repository
            .find_by_id(job_id)
            .await?
            .ok_or(GetJobStatusError::JobNotFound(job_id))
    }

    pub async fn jobs_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<AnalysisJob>, GetJobStatusError> {
        Ok(self.job_repository.find_by_document_id(document_id).await?)
    }

    pub async fn active_jobs(&self) -> Result<Vec<AnalysisJob>, GetJobStatusError> {
        Ok(self.job_repository.find_active_jobs().await?)
    }
}
