use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{AnalysisJob, AnalysisMode, ClauseSummary};
use crate::domain::value_objects::JobStatus;
use crate::infrastructure::database::schema::analysis_jobs;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = analysis_jobs)]
#[diesel(primary_key(id))]
pub struct JobModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub mode: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub clause_summaries: serde_json::Value,
    pub document_summary: Option<String>,
    pub failure_count: i32,
    pub total_clauses: i32,
    pub error: Option<String>,
    pub model_version: String,
    pub prompt_version: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = analysis_jobs)]
pub struct UpdateJobModel {
    pub status: Option<String>,
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub clause_summaries: Option<serde_json::Value>,
    pub document_summary: Option<Option<String>>,
    pub failure_count: Option<i32>,
    pub total_clauses: Option<i32>,
    pub error: Option<Option<String>>,
}

impl From<&AnalysisJob> for JobModel {
    fn from(job: &AnalysisJob) -> Self {
        Self {
            id: job.id(),
            document_id: job.document_id(),
            mode: job.mode().as_str().to_string(),
            status: job.status().as_str().to_string(),
            created_at: job.created_at(),
            started_at: job.started_at(),
            completed_at: job.completed_at(),
            clause_summaries: serde_json::to_value(job.clause_summaries())
                .unwrap_or(serde_json::Value::Array(Vec::new())),
            document_summary: job.document_summary().map(|s| s.to_string()),
            failure_count: job.failure_count(),
            total_clauses: job.total_clauses(),
            error: error_column(job),
            model_version: job.model_version().to_string(),
            prompt_version: job.prompt_version().to_string(),
        }
    }
}

impl From<&AnalysisJob> for UpdateJobModel {
    fn from(job: &AnalysisJob) -> Self {
        Self {
            status: Some(job.status().as_str().to_string()),
            started_at: Some(job.started_at()),
            completed_at: Some(job.completed_at()),
            clause_summaries: Some(
                serde_json::to_value(job.clause_summaries())
                    .unwrap_or(serde_json::Value::Array(Vec::new())),
            ),
            document_summary: Some(job.document_summary().map(|s| s.to_string())),
            failure_count: Some(job.failure_count()),
            total_clauses: Some(job.total_clauses()),
            error: Some(error_column(job)),
        }
    }
}

/// A failed status carries its message in the error column.
fn error_column(job: &AnalysisJob) -> Option<String> {
    match job.status() {
        JobStatus::Failed(error) => Some(error.clone()),
        _ => job.error().map(|s| s.to_string()),
    }
}

impl TryFrom<JobModel> for AnalysisJob {
    type Error = String;

    fn try_from(model: JobModel) -> Result<Self, String> {
        let mode = AnalysisMode::from_str(&model.mode)?;
        let status = JobStatus::from_str_with_error(&model.status, model.error.clone())?;

        let clause_summaries: Vec<ClauseSummary> =
            serde_json::from_value(model.clause_summaries)
                .map_err(|e| format!("Failed to parse clause summaries: {}", e))?;

        Ok(AnalysisJob::from_database(
            model.id,
            model.document_id,
            mode,
            status,
            model.created_at,
            model.started_at,
            model.completed_at,
            clause_summaries,
            model.document_summary,
            model.failure_count,
            model.total_clauses,
            model.error,
            model.model_version,
            model.prompt_version,
        ))
    }
}
