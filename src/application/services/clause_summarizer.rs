use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::clause_retriever::{ClauseRetriever, RetrievedClause};
use crate::application::ports::text_generator::TextGenerator;

/// Returned in place of a summary when the generation call fails.
pub const FALLBACK_CLAUSE_SUMMARY: &str = "Summary unavailable due to processing error.";

/// Placeholder for an absent neighbor (first/last clause of a document).
const NO_NEIGHBOR: &str = "None";

/// Retrieved clauses appended to the prompt for disambiguation.
const RETRIEVAL_K: usize = 3;

#[derive(Debug, Clone)]
pub struct ClauseSummaryRequest {
    /// Enables best-effort retrieval context when the document is indexed.
    pub document_id: Option<Uuid>,
    pub target_text: String,
    pub prev_text: Option<String>,
    pub next_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClauseSummaryOutcome {
    pub summary_text: String,
    pub failed: bool,
}

/// Produces the one-sentence summary for a single clause. Generation
/// failures are converted into a fixed fallback plus a `failed` flag so one
/// bad model call never aborts a batch.
pub struct ClauseSummarizerService {
    generator: Arc<dyn TextGenerator>,
    retriever: Arc<dyn ClauseRetriever>,
    pub model_version: String,
    pub prompt_version: String,
}

impl ClauseSummarizerService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<dyn ClauseRetriever>,
        model_version: String,
        prompt_version: String,
    ) -> Self {
        Self {
            generator,
            retriever,
            model_version,
            prompt_version,
        }
    }

    pub async fn summarize(&self, request: ClauseSummaryRequest) -> ClauseSummaryOutcome {
        let retrieved = match request.document_id {
            Some(document_id) => {
                let results = self
                    .retriever
                    .retrieve_or_empty(document_id, &request.target_text, RETRIEVAL_K)
                    .await;
                filter_duplicates(results, &request)
            }
            None => Vec::new(),
        };

        let prompt = build_clause_prompt(&request, &retrieved);

        match self.generator.generate(&prompt).await {
            Ok(summary) => ClauseSummaryOutcome {
                summary_text: summary.trim().to_string(),
                failed: false,
            },
            Err(e) => {
                tracing::warn!("Clause summarization failed: {}", e);
                ClauseSummaryOutcome {
                    summary_text: FALLBACK_CLAUSE_SUMMARY.to_string(),
                    failed: true,
                }
            }
        }
    }
}

/// Drop retrieved clauses that exactly duplicate the target or its
/// neighbors; those are already in the prompt.
fn filter_duplicates(
    retrieved: Vec<RetrievedClause>,
    request: &ClauseSummaryRequest,
) -> Vec<RetrievedClause> {
    retrieved
        .into_iter()
        .filter(|r| {
            r.text != request.target_text
                && Some(r.text.as_str()) != request.prev_text.as_deref()
                && Some(r.text.as_str()) != request.next_text.as_deref()
        })
        .collect()
}

fn build_clause_prompt(request: &ClauseSummaryRequest, retrieved: &[RetrievedClause]) -> String {
    let prev = request.prev_text.as_deref().unwrap_or(NO_NEIGHBOR);
    let next = request.next_text.as_deref().unwrap_or(NO_NEIGHBOR);

    let related = if retrieved.is_empty() {
        NO_NEIGHBOR.to_string()
    } else {
        retrieved
            .iter()
            .map(|r| format!("[Clause {} - {}] {}", r.clause_no, r.category, r.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an expert legal analyst. Summarize the TARGET CLAUSE below.\n\
         \n\
         CONTEXT INFORMATION:\n\
         The surrounding and related clauses are provided only for disambiguation; do NOT summarize them.\n\
         \n\
         --- BEGIN CONTEXT ---\n\
         PREVIOUS CLAUSE: {prev}\n\
         NEXT CLAUSE: {next}\n\
         RELATED CLAUSES:\n{related}\n\
         --- END CONTEXT ---\n\
         \n\
         TARGET CLAUSE:\n\
         \"{target}\"\n\
         \n\
         INSTRUCTIONS:\n\
         1. One concise sentence capturing the obligation/right/definition.\n\
         2. If boilerplate, state that briefly.\n\
         3. Avoid lead-ins like \"The clause states that...\".\n\
         \n\
         Summary:",
        prev = prev,
        next = next,
        related = related,
        target = request.target_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::application::ports::clause_retriever::RetrievalError;
    use crate::application::ports::text_generator::{TextChunkStream, TextGeneratorError};
    use crate::domain::entities::Clause;
    use crate::domain::value_objects::ClauseCategory;

    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingGenerator {
        fn new(fail: bool) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(TextGeneratorError::GenerationFailed("timeout".to_string()))
            } else {
                Ok(" Supplier must deliver on schedule. ".to_string())
            }
        }

        async fn generate_stream(
            &self,
            _prompt: &str,
        ) -> Result<TextChunkStream, TextGeneratorError> {
            Err(TextGeneratorError::GenerationFailed("not used".to_string()))
        }
    }

    struct FixedRetriever {
        results: Vec<RetrievedClause>,
    }

    #[async_trait]
    impl ClauseRetriever for FixedRetriever {
        async fn index_document(
            &self,
            _document_id: Uuid,
            _clauses: &[Clause],
        ) -> Result<(), RetrievalError> {
            Ok(())
        }

        async fn retrieve(
            &self,
            _document_id: Uuid,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<RetrievedClause>, RetrievalError> {
            Ok(self.results.clone())
        }
    }

    fn retrieved(no: i32, text: &str) -> RetrievedClause {
        RetrievedClause {
            clause_no: no,
            category: ClauseCategory::new("Payment"),
            text: text.to_string(),
            similarity: 0.9,
        }
    }

    fn service(generator: Arc<RecordingGenerator>, results: Vec<RetrievedClause>) -> ClauseSummarizerService {
        ClauseSummarizerService::new(
            generator,
            Arc::new(FixedRetriever { results }),
            "llama3-legal-v1".to_string(),
            "v2.0-context-aware".to_string(),
        )
    }

    #[tokio::test]
    async fn test_successful_summary_is_trimmed() {
        let generator = Arc::new(RecordingGenerator::new(false));
        let service = service(generator.clone(), Vec::new());

        let outcome = service
            .summarize(ClauseSummaryRequest {
                document_id: None,
                target_text: "The Supplier shall deliver on schedule.".to_string(),
                prev_text: None,
                next_text: None,
            })
            .await;

        assert!(!outcome.failed);
        assert_eq!(outcome.summary_text, "Supplier must deliver on schedule.");
    }

    #[tokio::test]
    async fn test_generation_error_returns_fallback_never_panics() {
        let generator = Arc::new(RecordingGenerator::new(true));
        let service = service(generator, Vec::new());

        let outcome = service
            .summarize(ClauseSummaryRequest {
                document_id: None,
                target_text: "Any clause".to_string(),
                prev_text: None,
                next_text: None,
            })
            .await;

        assert!(outcome.failed);
        assert_eq!(outcome.summary_text, FALLBACK_CLAUSE_SUMMARY);
    }

    #[tokio::test]
    async fn test_missing_neighbors_use_sentinel() {
        let generator = Arc::new(RecordingGenerator::new(false));
        let service = service(generator.clone(), Vec::new());

        service
            .summarize(ClauseSummaryRequest {
                document_id: None,
                target_text: "First clause of the document.".to_string(),
                prev_text: None,
                next_text: Some("Second clause text.".to_string()),
            })
            .await;

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("PREVIOUS CLAUSE: None"));
        assert!(prompts[0].contains("NEXT CLAUSE: Second clause text."));
    }

    #[tokio::test]
    async fn test_retrieved_duplicates_of_window_are_filtered() {
        let generator = Arc::new(RecordingGenerator::new(false));
        let target = "The Customer shall pay net thirty.";
        let prev = "Prior clause.";
        let results = vec![
            retrieved(4, target),
            retrieved(2, prev),
            retrieved(9, "Late payments accrue interest at two percent."),
        ];
        let service = service(generator.clone(), results);

        service
            .summarize(ClauseSummaryRequest {
                document_id: Some(Uuid::new_v4()),
                target_text: target.to_string(),
                prev_text: Some(prev.to_string()),
                next_text: None,
            })
            .await;

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Late payments accrue interest"));
        assert!(!prompts[0].contains("[Clause 4"));
        assert!(!prompts[0].contains("[Clause 2"));
    }
}
