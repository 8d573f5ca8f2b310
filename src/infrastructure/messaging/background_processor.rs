use std::sync::Arc;

use crate::application::services::AnalysisPipelineService;
use crate::application::services::analysis_pipeline::PipelineOutput;
use crate::domain::entities::AnalysisJob;
use crate::domain::repositories::{DocumentRepository, JobRepository};
use crate::infrastructure::messaging::MpscJobReceiver;

/// Worker pool that pulls analysis jobs off the queue and runs them to
/// completion. A job's failure is recorded on its own row; it never affects
/// another job, the cache, the index, or any conversation.
pub struct BackgroundProcessor {
    job_receiver: Arc<MpscJobReceiver>,
    job_repository: Arc<dyn JobRepository>,
    document_repository: Arc<dyn DocumentRepository>,
    pipeline: Arc<AnalysisPipelineService>,
    worker_count: usize,
}

impl BackgroundProcessor {
    pub fn new(
        job_receiver: Arc<MpscJobReceiver>,
        job_repository: Arc<dyn JobRepository>,
        document_repository: Arc<dyn DocumentRepository>,
        pipeline: Arc<AnalysisPipelineService>,
    ) -> Self {
        Self {
            job_receiver,
            job_repository,
            document_repository,
            pipeline,
            worker_count: 3,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    pub async fn start(&self) {
        tracing::info!("Starting analysis workers: {}", self.worker_count);

        let mut handles = Vec::new();

        for worker_id in 0..self.worker_count {
            let worker = self.clone_for_worker();
            handles.push(tokio::spawn(async move {
                worker.worker_loop(worker_id).await;
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!("Worker {} panicked: {}", i, e);
            }
        }

        tracing::info!("Analysis workers stopped");
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!("Worker {} started", worker_id);

        while let Some(job) = self.job_receiver.recv().await {
            tracing::info!("Worker {} processing job {}", worker_id, job.id());
            self.process_job(job).await;
        }

        tracing::debug!("Worker {} stopped, queue closed", worker_id);
    }

    async fn process_job(&self, mut job: AnalysisJob) {
        let job_id = job.id();
        let start_time = std::time::Instant::now();

        if let Err(e) = job.start_processing() {
            tracing::error!("Cannot start job {}: {}", job_id, e);
            return;
        }
        if let Err(e) = self.job_repository.update(&job).await {
            tracing::error!("Failed to persist PROCESSING for job {}: {}", job_id, e);
            return;
        }

        let transition = match self.run_pipeline(&job).await {
            Ok(PipelineOutput::Eager {
                clause_summaries,
                document_summary,
            }) => job.complete_summarization(clause_summaries, document_summary),
            Ok(PipelineOutput::Deferred {
                total_clauses,
                document_summary,
            }) => job.complete_deferred(total_clauses, document_summary),
            Err(error) => {
                tracing::warn!("Job {} failed: {}", job_id, error);
                job.fail_processing(error)
            }
        };

        if let Err(e) = transition {
            tracing::error!("Invalid terminal transition for job {}: {}", job_id, e);
        }

        if let Err(e) = self.job_repository.update(&job).await {
            tracing::error!("Failed to persist final state for job {}: {}", job_id, e);
            return;
        }

        tracing::info!(
            "Job {} finished as {} in {:.2}s",
            job_id,
            job.status(),
            start_time.elapsed().as_secs_f64()
        );
    }

    async fn run_pipeline(&self, job: &AnalysisJob) -> Result<PipelineOutput, String> {
        let document = self
            .document_repository
            .find_by_id(job.document_id())
            .await
            .map_err(|e| format!("Failed to load document: {}", e))?
            .ok_or_else(|| format!("Document not found: {}", job.document_id()))?;

        self.pipeline
            .run(&document, job.mode())
            .await
            .map_err(|e| e.to_string())
    }

    fn clone_for_worker(&self) -> Self {
        Self {
            job_receiver: self.job_receiver.clone(),
            job_repository: self.job_repository.clone(),
            document_repository: self.document_repository.clone(),
            pipeline: self.pipeline.clone(),
            worker_count: self.worker_count,
        }
    }
}
