use async_trait::async_trait;

use crate::domain::entities::AnalysisJob;

#[derive(Debug)]
pub enum JobQueueError {
    ConnectionError(String),
    InvalidJob(String),
}

impl std::fmt::Display for JobQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobQueueError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            JobQueueError::InvalidJob(msg) => write!(f, "Invalid job: {}", msg),
        }
    }
}

impl std::error::Error for JobQueueError {}

/// Hand-off between the submitting request and the background worker pool.
/// Submission returns immediately; workers pull jobs and run them to
/// completion (no cancellation model).
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: AnalysisJob) -> Result<(), JobQueueError>;

    /// Current number of jobs waiting to be picked up.
    async fn size(&self) -> Result<usize, JobQueueError>;

    async fn is_empty(&self) -> Result<bool, JobQueueError> {
        Ok(self.size().await? == 0)
    }
}
