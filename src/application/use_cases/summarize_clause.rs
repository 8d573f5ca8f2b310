use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::ClauseSummarizerService;
use crate::application::services::clause_summarizer::ClauseSummaryRequest;

#[derive(Debug, Clone)]
pub struct SummarizeClauseRequest {
    /// Retrieval context is looked up when the document is identified and
    /// indexed; absent or unindexed documents degrade to window-only context.
    pub document_id: Option<Uuid>,
    pub clause_text: String,
    pub prev_text: Option<String>,
    pub next_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SummarizeClauseResponse {
    pub summary_text: String,
    pub is_failed: bool,
    pub model_version: String,
    pub prompt_version: String,
}

/// On-demand single-clause summarization, used by the deferred orchestrator
/// mode and by callers re-summarizing one clause without a full job.
pub struct SummarizeClauseUseCase {
    clause_summarizer: Arc<ClauseSummarizerService>,
}

impl SummarizeClauseUseCase {
    pub fn new(clause_summarizer: Arc<ClauseSummarizerService>) -> Self {
        Self { clause_summarizer }
    }

    pub async fn execute(&self, request: SummarizeClauseRequest) -> SummarizeClauseResponse {
        let outcome = self
            .clause_summarizer
            .summarize(ClauseSummaryRequest {
                document_id: request.document_id,
                target_text: request.clause_text,
                prev_text: request.prev_text,
                next_text: request.next_text,
            })
            .await;

        SummarizeClauseResponse {
            summary_text: outcome.summary_text,
            is_failed: outcome.failed,
            model_version: self.clause_summarizer.model_version.clone(),
            prompt_version: self.clause_summarizer.prompt_version.clone(),
        }
    }
}
