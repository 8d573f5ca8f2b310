use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::ChatService;
use crate::domain::repositories::{
    ClauseEmbeddingRepository, JobRepository, job_repository::JobRepositoryError,
};
use crate::domain::value_objects::ClauseCategory;

#[derive(Debug)]
pub enum SuggestQuestionsError {
    JobNotFound(Uuid),
    SummaryNotReady(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for SuggestQuestionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestQuestionsError::JobNotFound(id) => write!(f, "Analysis job not found: {}", id),
            SuggestQuestionsError::SummaryNotReady(id) => {
                write!(f, "Job {} has no document summary yet", id)
            }
            SuggestQuestionsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SuggestQuestionsError {}

impl From<JobRepositoryError> for SuggestQuestionsError {
    fn from(error: JobRepositoryError) -> Self {
        SuggestQuestionsError::RepositoryError(error.to_string())
    }
}

/// Candidate questions for a finished analysis. The contract type is
/// inferred from the indexed clause categories; generation failures inside
/// the engine resolve to a fixed default list, so only missing inputs can
/// error here.
pub struct SuggestQuestionsUseCase {
    job_repository: Arc<dyn JobRepository>,
    embedding_repository: Arc<dyn ClauseEmbeddingRepository>,
    chat_service: Arc<ChatService>,
}

impl SuggestQuestionsUseCase {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        embedding_repository: Arc<dyn ClauseEmbeddingRepository>,
        chat_service: Arc<ChatService>,
    ) -> Self {
        Self {
            job_repository,
            embedding_repository,
            chat_service,
        }
    }

    pub async fn execute(&self, job_id: Uuid) -> Result<Vec<String>, SuggestQuestionsError> {
        let job = self
            .job_repository
            .find_by_id(job_id)
            .await?
            .ok_or(SuggestQuestionsError::JobNotFound(job_id))?;

        let summary = job
            .document_summary()
            .ok_or(SuggestQuestionsError::SummaryNotReady(job_id))?
            .to_string();

        // Best-effort: an unindexed document just means a generic type.
        let categories: Vec<ClauseCategory> = match self
            .embedding_repository
            .find_by_document(job.document_id())
            .await
        {
            Ok(entries) => entries.into_iter().map(|e| e.category).collect(),
            Err(e) => {
                tracing::warn!(
                    "Could not load clause categories for document {}: {}",
                    job.document_id(),
                    e
                );
                Vec::new()
            }
        };

        Ok(self.chat_service.suggest_questions(&summary, &categories).await)
    }
}
