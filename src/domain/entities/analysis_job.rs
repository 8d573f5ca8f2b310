use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::ClauseSummary;
use crate::domain::value_objects::JobStatus;

/// Whether clause-level summaries are produced eagerly for the whole
/// document, or deferred to on-demand calls after the job completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    Eager,
    Deferred,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Eager => "eager",
            AnalysisMode::Deferred => "deferred",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "eager" => Ok(AnalysisMode::Eager),
            "deferred" => Ok(AnalysisMode::Deferred),
            _ => Err(format!("Unknown analysis mode: {}", s)),
        }
    }
}

/// One summarization request over one document. The job record is the only
/// shared state between the submitting request and the background worker;
/// every transition is persisted through the job repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    id: Uuid,
    document_id: Uuid,
    mode: AnalysisMode,
    status: JobStatus,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    clause_summaries: Vec<ClauseSummary>,
    document_summary: Option<String>,
    failure_count: i32,
    total_clauses: i32,
    error: Option<String>,
    model_version: String,
    prompt_version: String,
}

impl AnalysisJob {
    pub fn new(
        document_id: Uuid,
        mode: AnalysisMode,
        model_version: String,
        prompt_version: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            mode,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            clause_summaries: Vec::new(),
            document_summary: None,
            failure_count: 0,
            total_clauses: 0,
            error: None,
            model_version,
            prompt_version,
        }
    }

    /// Reconstruct from persisted values.
    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        document_id: Uuid,
        mode: AnalysisMode,
        status: JobStatus,
        created_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        clause_summaries: Vec<ClauseSummary>,
        document_summary: Option<String>,
        failure_count: i32,
        total_clauses: i32,
        error: Option<String>,
        model_version: String,
        prompt_version: String,
    ) -> Self {
        Self {
            id,
            document_id,
            mode,
            status,
            created_at,
            started_at,
            completed_at,
            clause_summaries,
            document_summary,
            failure_count,
            total_clauses,
            error,
            model_version,
            prompt_version,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn clause_summaries(&self) -> &[ClauseSummary] {
        &self.clause_summaries
    }

    pub fn document_summary(&self) -> Option<&str> {
        self.document_summary.as_deref()
    }

    pub fn failure_count(&self) -> i32 {
        self.failure_count
    }

    pub fn total_clauses(&self) -> i32 {
        self.total_clauses
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn prompt_version(&self) -> &str {
        &self.prompt_version
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        if !self.status.is_pending() {
            return Err(format!("Job is not in pending state: {:?}", self.status));
        }

        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Record the outcome of eager clause-level + document-level
    /// summarization. The terminal status is derived from the failure
    /// counter, never set directly.
    pub fn complete_summarization(
        &mut self,
        clause_summaries: Vec<ClauseSummary>,
        document_summary: String,
    ) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        let total = clause_summaries.len();
        let failures = clause_summaries.iter().filter(|s| s.is_failed).count();

        self.status = JobStatus::from_counts(failures, total);
        self.failure_count = failures as i32;
        self.total_clauses = total as i32;
        self.clause_summaries = clause_summaries;
        self.document_summary = Some(document_summary);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Deferred-mode completion: the document summary and retrieval index
    /// are ready, clause summaries stay empty and are produced on demand.
    pub fn complete_deferred(
        &mut self,
        total_clauses: i32,
        document_summary: String,
    ) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.status = JobStatus::Completed;
        self.total_clauses = total_clauses;
        self.document_summary = Some(document_summary);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail_processing(&mut self, error: String) -> Result<(), String> {
        if self.status.is_terminal() {
            return Err("Job already reached a terminal state".to_string());
        }

        self.status = JobStatus::Failed(error.clone());
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ClauseCategory;

    fn summary(no: i32, failed: bool) -> ClauseSummary {
        ClauseSummary::new(
            no,
            ClauseCategory::new("Payment"),
            format!("clause text {}", no),
            if failed {
                "Summary unavailable due to processing error.".to_string()
            } else {
                format!("summary {}", no)
            },
            failed,
            "llama3-legal-v1".to_string(),
            "v2.0-context-aware".to_string(),
        )
    }

    fn started_job() -> AnalysisJob {
        let mut job = AnalysisJob::new(
            Uuid::new_v4(),
            AnalysisMode::Eager,
            "llama3-legal-v1".to_string(),
            "v2.0-context-aware".to_string(),
        );
        job.start_processing().unwrap();
        job
    }

    #[test]
    fn test_job_creation() {
        let document_id = Uuid::new_v4();
        let job = AnalysisJob::new(
            document_id,
            AnalysisMode::Eager,
            "m".to_string(),
            "p".to_string(),
        );

        assert_eq!(job.document_id(), document_id);
        assert_eq!(job.status(), &JobStatus::Pending);
        assert!(job.is_active());
        assert!(job.clause_summaries().is_empty());
    }

    #[test]
    fn test_start_requires_pending() {
        let mut job = started_job();
        assert!(job.start_processing().is_err());
    }

    #[test]
    fn test_complete_with_no_failures() {
        let mut job = started_job();
        job.complete_summarization(vec![summary(1, false), summary(2, false)], "exec".to_string())
            .unwrap();

        assert_eq!(job.status(), &JobStatus::Completed);
        assert_eq!(job.failure_count(), 0);
        assert_eq!(job.total_clauses(), 2);
        assert!(job.completed_at().is_some());
    }

    #[test]
    fn test_complete_with_all_failures() {
        let mut job = started_job();
        job.complete_summarization(vec![summary(1, true), summary(2, true)], "exec".to_string())
            .unwrap();

        assert!(job.status().is_failed());
        assert_eq!(job.failure_count(), 2);
    }

    #[test]
    fn test_complete_with_some_failures() {
        let mut job = started_job();
        job.complete_summarization(
            vec![summary(1, false), summary(2, true), summary(3, false)],
            "exec".to_string(),
        )
        .unwrap();

        assert_eq!(job.status(), &JobStatus::PartialFailure);
        assert_eq!(job.failure_count(), 1);
        assert_eq!(job.total_clauses(), 3);
    }

    #[test]
    fn test_deferred_completion_leaves_summaries_empty() {
        let mut job = AnalysisJob::new(
            Uuid::new_v4(),
            AnalysisMode::Deferred,
            "m".to_string(),
            "p".to_string(),
        );
        job.start_processing().unwrap();
        job.complete_deferred(42, "exec".to_string()).unwrap();

        assert_eq!(job.status(), &JobStatus::Completed);
        assert_eq!(job.total_clauses(), 42);
        assert!(job.clause_summaries().is_empty());
    }

    #[test]
    fn test_failure_records_error_and_timestamp() {
        let mut job = started_job();
        job.fail_processing("No clauses available for summarization".to_string())
            .unwrap();

        assert!(job.status().is_failed());
        assert_eq!(job.error(), Some("No clauses available for summarization"));
        assert!(job.completed_at().is_some());
        assert!(job.fail_processing("again".to_string()).is_err());
    }
}
