use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::start_analysis::StartAnalysisResponse;
use crate::application::use_cases::summarize_clause::SummarizeClauseResponse;
use crate::domain::entities::{AnalysisJob, ClauseSummary};

#[derive(Debug, Serialize)]
pub struct StartAnalysisDto {
    pub job_id: Uuid,
    pub status: String,
}

impl From<StartAnalysisResponse> for StartAnalysisDto {
    fn from(response: StartAnalysisResponse) -> Self {
        Self {
            job_id: response.job_id,
            status: response.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClauseSummaryDto {
    pub clause_no: i32,
    pub category: String,
    pub original_text: String,
    pub summary_text: String,
    pub is_failed: bool,
    pub model_version: String,
    pub prompt_version: String,
}

impl From<&ClauseSummary> for ClauseSummaryDto {
    fn from(summary: &ClauseSummary) -> Self {
        Self {
            clause_no: summary.clause_no,
            category: summary.category.as_str().to_string(),
            original_text: summary.original_text.clone(),
            summary_text: summary.summary_text.clone(),
            is_failed: summary.is_failed,
            model_version: summary.model_version.clone(),
            prompt_version: summary.prompt_version.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobStatusDto {
    pub job_id: Uuid,
    pub document_id: Uuid,
    pub mode: String,
    pub status: String,
    pub is_terminal: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub clause_summaries: Vec<ClauseSummaryDto>,
    pub document_summary: Option<String>,
    pub failure_count: i32,
    pub total_clauses: i32,
    pub error: Option<String>,
    pub model_version: String,
    pub prompt_version: String,
}

impl From<&AnalysisJob> for JobStatusDto {
    fn from(job: &AnalysisJob) -> Self {
        Self {
            job_id: job.id(),
            document_id: job.document_id(),
            mode: job.mode().as_str().to_string(),
            status: job.status().as_str().to_string(),
            is_terminal: job.status().is_terminal(),
            created_at: job.created_at(),
            started_at: job.started_at(),
            completed_at: job.completed_at(),
            clause_summaries: job.clause_summaries().iter().map(ClauseSummaryDto::from).collect(),
            document_summary: job.document_summary().map(|s| s.to_string()),
            failure_count: job.failure_count(),
            total_clauses: job.total_clauses(),
            error: job
                .status()
                .error_message()
                .or(job.error())
                .map(|s| s.to_string()),
            model_version: job.model_version().to_string(),
            prompt_version: job.prompt_version().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeClauseRequestDto {
    pub document_id: Option<Uuid>,
    pub clause_text: String,
    pub prev_text: Option<String>,
    pub next_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeClauseDto {
    pub summary_text: String,
    pub is_failed: bool,
    pub model_version: String,
    pub prompt_version: String,
}

impl From<SummarizeClauseResponse> for SummarizeClauseDto {
    fn from(response: SummarizeClauseResponse) -> Self {
        Self {
            summary_text: response.summary_text,
            is_failed: response.is_failed,
            model_version: response.model_version,
            prompt_version: response.prompt_version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestedQuestionsDto {
    pub questions: Vec<String>,
}
