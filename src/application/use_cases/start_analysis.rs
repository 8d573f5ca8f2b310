use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::JobQueue;
use crate::domain::entities::{AnalysisJob, AnalysisMode};
use crate::domain::repositories::{
    DocumentRepository, JobRepository, document_repository::DocumentRepositoryError,
    job_repository::JobRepositoryError,
};
use crate::domain::value_objects::JobStatus;

#[derive(Debug)]
pub enum StartAnalysisError {
    DocumentNotFound(Uuid),
    UnsupportedFormat(String),
    RepositoryError(String),
    QueueError(String),
}

impl std::fmt::Display for StartAnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartAnalysisError::DocumentNotFound(id) => write!(f, "Document not found: {}", id),
            StartAnalysisError::UnsupportedFormat(name) => {
                write!(f, "Document is not a supported format: {}", name)
            }
            StartAnalysisError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            StartAnalysisError::QueueError(msg) => write!(f, "Queue error: {}", msg),
        }
    }
}

impl std::error::Error for StartAnalysisError {}

impl From<DocumentRepositoryError> for StartAnalysisError {
    fn from(error: DocumentRepositoryError) -> Self {
        StartAnalysisError::RepositoryError(error.to_string())
    }
}

impl From<JobRepositoryError> for StartAnalysisError {
    fn from(error: JobRepositoryError) -> Self {
        StartAnalysisError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StartAnalysisResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// Accepts a summarization request: validates the document, persists a
/// pending job, and hands it to the worker pool. Input errors surface here,
/// before any job exists.
pub struct StartAnalysisUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    job_repository: Arc<dyn JobRepository>,
    job_queue: Arc<dyn JobQueue>,
    mode: AnalysisMode,
    model_version: String,
    prompt_version: String,
}

impl StartAnalysisUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        job_repository: Arc<dyn JobRepository>,
        job_queue: Arc<dyn JobQueue>,
        mode: AnalysisMode,
        model_version: String,
        prompt_version: String,
    ) -> Self {
        Self {
            document_repository,
            job_repository,
            job_queue,
            mode,
            model_version,
            prompt_version,
        }
    }

    pub async fn execute(
        &self,
        document_id: Uuid,
    ) -> Result<StartAnalysisResponse, StartAnalysisError> {
        let document = self
            .document_repository
            .find_by_id(document_id)
            .await?
            .ok_or(StartAnalysisError::DocumentNotFound(document_id))?;

        if !document.is_pdf() {
            return Err(StartAnalysisError::UnsupportedFormat(
                document.file_name().to_string(),
            ));
        }

        let job = AnalysisJob::new(
            document_id,
            self.mode,
            self.model_version.clone(),
            self.prompt_version.clone(),
        );
        self.job_repository.save(&job).await?;

        self.job_queue
            .enqueue(job.clone())
            .await
            .map_err(|e| StartAnalysisError::QueueError(e.to_string()))?;

        Ok(StartAnalysisResponse {
            job_id: job.id(),
            status: job.status().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::application::ports::job_queue::JobQueueError;
    use crate::domain::entities::Document;
    use crate::domain::value_objects::ContentHash;

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
            _hash: &ContentHash,
        ) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(None)
        }

        async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.save(document).await
        }

        async fn list(&self, _limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct InMemoryJobs {
        rows: Mutex<HashMap<Uuid, AnalysisJob>>,
    }

    #[async_trait]
    impl JobRepository for InMemoryJobs {
        async fn save(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError> {
            self.rows.lock().unwrap().insert(job.id(), job.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            job_id: Uuid,
        ) -> Result<Option<AnalysisJob>, JobRepositoryError> {
            Ok(self.rows.lock().unwrap().get(&job_id).cloned())
        }

        async fn find_by_document_id(
            &self,
            _document_id: Uuid,
        ) -> Result<Vec<AnalysisJob>, JobRepositoryError> {
            Ok(Vec::new())
        }

        async fn find_active_jobs(&self) -> Result<Vec<AnalysisJob>, JobRepositoryError> {
            Ok(Vec::new())
        }

        async fn update(&self, job: &AnalysisJob) -> Result<(), JobRepositoryError> {
            self.save(job).await
        }
    }

    #[derive(Default)]
    struct RecordingQueue {
        jobs: Mutex<Vec<AnalysisJob>>,
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn enqueue(&self, job: AnalysisJob) -> Result<(), JobQueueError> {
            self.jobs.lock().unwrap().push(job);
            Ok(())
        }

        async fn size(&self) -> Result<usize, JobQueueError> {
            Ok(self.jobs.lock().unwrap().len())
        }
    }

    struct Harness {
        use_case: StartAnalysisUseCase,
        documents: Arc<InMemoryDocuments>,
        jobs: Arc<InMemoryJobs>,
        queue: Arc<RecordingQueue>,
    }

    fn harness() -> Harness {
        let documents = Arc::new(InMemoryDocuments::default());
        let jobs = Arc::new(InMemoryJobs::default());
        let queue = Arc::new(RecordingQueue::default());
        let use_case = StartAnalysisUseCase::new(
            documents.clone(),
            jobs.clone(),
            queue.clone(),
            AnalysisMode::Eager,
            "llama3-legal-v1".to_string(),
            "v2.0-context-aware".to_string(),
        );
        Harness {
            use_case,
            documents,
            jobs,
            queue,
        }
    }

    fn pdf_document() -> Document {
        Document::new(
            "msa.pdf".to_string(),
            "/uploads/msa.pdf".to_string(),
            100,
            ContentHash::from_bytes(b"msa"),
        )
    }

    #[tokio::test]
    async fn test_missing_document_creates_no_job() {
        let h = harness();
        let result = h.use_case.execute(Uuid::new_v4()).await;

        assert!(matches!(result, Err(StartAnalysisError::DocumentNotFound(_))));
        assert!(h.jobs.rows.lock().unwrap().is_empty());
        assert_eq!(h.queue.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_before_job_creation() {
        let h = harness();
        let document = Document::new(
            "notes.txt".to_string(),
            "/uploads/notes.txt".to_string(),
            10,
            ContentHash::from_bytes(b"txt"),
        );
        h.documents.save(&document).await.unwrap();

        let result = h.use_case.execute(document.id()).await;

        assert!(matches!(result, Err(StartAnalysisError::UnsupportedFormat(_))));
        assert!(h.jobs.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_is_persisted_pending_and_enqueued() {
        let h = harness();
        let document = pdf_document();
        h.documents.save(&document).await.unwrap();

        let response = h.use_case.execute(document.id()).await.unwrap();

        assert_eq!(response.status, JobStatus::Pending);

        let stored = h.jobs.find_by_id(response.job_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), &JobStatus::Pending);
        assert_eq!(stored.document_id(), document.id());

        let queued = h.queue.jobs.lock().unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].id(), response.job_id);
    }
}
