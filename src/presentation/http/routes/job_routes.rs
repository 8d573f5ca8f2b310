use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::JobHandler;

pub fn job_routes(handler: Arc<JobHandler>) -> Router {
    Router::new()
        .route(
            "/analyses/documents/{document_id}",
            post(JobHandler::start_analysis),
        )
        .route(
            "/analyses/documents/{document_id}/jobs",
            get(JobHandler::get_document_jobs),
        )
        .route("/analyses/active", get(JobHandler::get_active_jobs))
        .route("/analyses/{job_id}", get(JobHandler::get_job_status))
        .route(
            "/analyses/{job_id}/suggestions",
            get(JobHandler::suggest_questions),
        )
        .route("/clauses/summarize", post(JobHandler::summarize_clause))
        .with_state(handler)
}
