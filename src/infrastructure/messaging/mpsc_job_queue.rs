use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::job_queue::{JobQueue, JobQueueError};
use crate::domain::entities::AnalysisJob;

/// In-process job queue: an unbounded mpsc channel plus a pending counter.
/// The submitting side holds the `MpscJobQueue`, the worker pool holds the
/// matching `MpscJobReceiver`.
pub struct MpscJobQueue {
    sender: mpsc::UnboundedSender<AnalysisJob>,
    pending: Arc<AtomicUsize>,
}

pub struct MpscJobReceiver {
    receiver: Mutex<mpsc::UnboundedReceiver<AnalysisJob>>,
    pending: Arc<AtomicUsize>,
}

impl MpscJobQueue {
    pub fn create_pair() -> (Self, MpscJobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let queue = Self {
            sender,
            pending: pending.clone(),
        };
        let receiver = MpscJobReceiver {
            receiver: Mutex::new(receiver),
            pending,
        };

        (queue, receiver)
    }
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, job: AnalysisJob) -> Result<(), JobQueueError> {
        if !job.status().is_pending() {
            return Err(JobQueueError::InvalidJob(format!(
                "Only pending jobs can be enqueued, got {}",
                job.status()
            )));
        }

        self.pending.fetch_add(1, Ordering::SeqCst);
        self.sender
            .send(job)
            .map_err(|_| JobQueueError::ConnectionError("Channel closed".to_string()))?;

        Ok(())
    }

    async fn size(&self) -> Result<usize, JobQueueError> {
        Ok(self.pending.load(Ordering::SeqCst))
    }
}

impl MpscJobReceiver {
    /// Blocks until a job is available or every sender is gone.
    pub async fn recv(&self) -> Option<AnalysisJob> {
        let job = self.receiver.lock().await.recv().await;
        if job.is_some() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::domain::entities::AnalysisMode;

    fn job() -> AnalysisJob {
        AnalysisJob::new(
            Uuid::new_v4(),
            AnalysisMode::Eager,
            "m".to_string(),
            "p".to_string(),
        )
    }

    #[tokio::test]
    async fn test_enqueue_dequeue_preserves_order() {
        let (queue, receiver) = MpscJobQueue::create_pair();

        let first = job();
        let second = job();
        queue.enqueue(first.clone()).await.unwrap();
        queue.enqueue(second.clone()).await.unwrap();

        assert_eq!(queue.size().await.unwrap(), 2);
        assert_eq!(receiver.recv().await.unwrap().id(), first.id());
        assert_eq!(receiver.recv().await.unwrap().id(), second.id());
        assert_eq!(queue.size().await.unwrap(), 0);
        assert!(queue.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_non_pending_job_rejected() {
        let (queue, _receiver) = MpscJobQueue::create_pair();

        let mut started = job();
        started.start_processing().unwrap();

        let result = queue.enqueue(started).await;
        assert!(matches!(result, Err(JobQueueError::InvalidJob(_))));
    }
}
