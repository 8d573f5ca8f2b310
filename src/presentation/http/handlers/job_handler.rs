use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::start_analysis::StartAnalysisError;
use crate::application::use_cases::summarize_clause::SummarizeClauseRequest;
use crate::application::use_cases::{
    GetJobStatusUseCase, StartAnalysisUseCase, SuggestQuestionsUseCase, SummarizeClauseUseCase,
};
use crate::presentation::http::dto::{
    ApiResponse, JobStatusDto, StartAnalysisDto, SuggestedQuestionsDto, SummarizeClauseDto,
    SummarizeClauseRequestDto,
};

pub struct JobHandler {
    start_analysis_use_case: Arc<StartAnalysisUseCase>,
    get_job_status_use_case: Arc<GetJobStatusUseCase>,
    summarize_clause_use_case: Arc<SummarizeClauseUseCase>,
    suggest_questions_use_case: Arc<SuggestQuestionsUseCase>,
}

impl JobHandler {
    pub fn new(
        start_analysis_use_case: Arc<StartAnalysisUseCase>,
        get_job_status_use_case: Arc<GetJobStatusUseCase>,
        summarize_clause_use_case: Arc<SummarizeClauseUseCase>,
        suggest_questions_use_case: Arc<SuggestQuestionsUseCase>,
    ) -> Self {
        Self {
            start_analysis_use_case,
            get_job_status_use_case,
            summarize_clause_use_case,
            suggest_questions_use_case,
        }
    }

    pub async fn start_analysis(
        State(handler): State<Arc<JobHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.start_analysis_use_case.execute(document_id).await {
            Ok(response) => Ok((
                StatusCode::ACCEPTED,
                Json(ApiResponse::success(StartAnalysisDto::from(response))),
            )),
            Err(e @ StartAnalysisError::DocumentNotFound(_)) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("DOCUMENT_NOT_FOUND", e.to_string())),
            )),
            Err(e @ StartAnalysisError::UnsupportedFormat(_)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("UNSUPPORTED_FORMAT", e.to_string())),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("ANALYSIS_START_FAILED", e.to_string())),
            )),
        }
    }

    pub async fn get_job_status(
        State(handler): State<Arc<JobHandler>>,
        Path(job_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.get_job_status_use_case.execute(job_id).await {
            Ok(job) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(JobStatusDto::from(&job))),
            )),
            Err(e) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("JOB_NOT_FOUND", e.to_string())),
            )),
        }
    }

    pub async fn get_document_jobs(
        State(handler): State<Arc<JobHandler>>,
        Path(document_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .get_job_status_use_case
            .jobs_for_document(document_id)
            .await
        {
            Ok(jobs) => {
                let dtos: Vec<JobStatusDto> = jobs.iter().map(JobStatusDto::from).collect();
                Ok((StatusCode::OK, Json(ApiResponse::success(dtos))))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("FETCH_FAILED", e.to_string())),
            )),
        }
    }

    pub async fn get_active_jobs(
        State(handler): State<Arc<JobHandler>>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.get_job_status_use_case.active_jobs().await {
            Ok(jobs) => {
                let dtos: Vec<JobStatusDto> = jobs.iter().map(JobStatusDto::from).collect();
                Ok((StatusCode::OK, Json(ApiResponse::success(dtos))))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("FETCH_FAILED", e.to_string())),
            )),
        }
    }

    /// On-demand single-clause summarization. Always 200: a generation
    /// failure is reported in-band through `is_failed`.
    pub async fn summarize_clause(
        State(handler): State<Arc<JobHandler>>,
        Json(request): Json<SummarizeClauseRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let response = handler
            .summarize_clause_use_case
            .execute(SummarizeClauseRequest {
                document_id: request.document_id,
                clause_text: request.clause_text,
                prev_text: request.prev_text,
                next_text: request.next_text,
            })
            .await;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(SummarizeClauseDto::from(response))),
        ))
    }

    pub async fn suggest_questions(
        State(handler): State<Arc<JobHandler>>,
        Path(job_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.suggest_questions_use_case.execute(job_id).await {
            Ok(questions) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(SuggestedQuestionsDto { questions })),
            )),
            Err(e) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("SUGGESTIONS_UNAVAILABLE", e.to_string())),
            )),
        }
    }
}
