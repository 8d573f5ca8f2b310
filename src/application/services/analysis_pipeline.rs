use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::clause_retriever::ClauseRetriever;
use crate::application::services::{
    ClauseExtractionService, ClauseSummarizerService, DocumentSummarizerService,
    clause_summarizer::ClauseSummaryRequest,
};
use crate::domain::entities::{AnalysisMode, Clause, ClauseSummary, Document};
use crate::domain::repositories::DocumentRepository;

/// Clauses summarized concurrently within one batch; batches run
/// sequentially to bound pressure on the generation service.
const CLAUSE_SUMMARY_BATCH_SIZE: usize = 5;

#[derive(Debug)]
pub enum PipelineError {
    NoClauses,
    ExtractionFailed(String),
    ClassificationFailed(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::NoClauses => write!(f, "No clauses available for summarization"),
            PipelineError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            PipelineError::ClassificationFailed(msg) => {
                write!(f, "Classification failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// What a finished pipeline hands back to the orchestrator for the job's
/// terminal transition.
#[derive(Debug)]
pub enum PipelineOutput {
    Eager {
        clause_summaries: Vec<ClauseSummary>,
        document_summary: String,
    },
    Deferred {
        total_clauses: i32,
        document_summary: String,
    },
}

/// Drives one analysis job end to end: extract, segment + classify (through
/// the cache), index for retrieval, then run clause-level and document-level
/// summarization concurrently. Only extraction, classification, and the
/// zero-clause guard can fail the pipeline; everything downstream degrades
/// per item.
pub struct AnalysisPipelineService {
    extraction: Arc<ClauseExtractionService>,
    retriever: Arc<dyn ClauseRetriever>,
    clause_summarizer: Arc<ClauseSummarizerService>,
    document_summarizer: Arc<DocumentSummarizerService>,
    document_repository: Arc<dyn DocumentRepository>,
}

impl AnalysisPipelineService {
    pub fn new(
        extraction: Arc<ClauseExtractionService>,
        retriever: Arc<dyn ClauseRetriever>,
        clause_summarizer: Arc<ClauseSummarizerService>,
        document_summarizer: Arc<DocumentSummarizerService>,
        document_repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            extraction,
            retriever,
            clause_summarizer,
            document_summarizer,
            document_repository,
        }
    }

    pub async fn run(
        &self,
        document: &Document,
        mode: AnalysisMode,
    ) -> Result<PipelineOutput, PipelineError> {
        let extracted = self
            .extraction
            .extract_text(document.file_path())
            .await
            .map_err(|e| PipelineError::ExtractionFailed(e.to_string()))?;

        if extracted.skipped_pages > 0 {
            tracing::warn!(
                "Document {}: {} of {} pages were unreadable",
                document.id(),
                extracted.skipped_pages,
                extracted.page_count
            );
        }

        // Record extraction metadata on first analysis; never rewritten.
        if document.page_count().is_none() {
            let mut analyzed = document.clone();
            analyzed.set_page_count(extracted.page_count);
            if let Err(e) = self.document_repository.update(&analyzed).await {
                tracing::warn!(
                    "Failed to record page count for document {}: {}",
                    document.id(),
                    e
                );
            }
        }

        if extracted.is_too_short() {
            tracing::info!(
                "Document {} extracted to {} chars, below the summarization minimum",
                document.id(),
                extracted.text.trim().len()
            );
            return Err(PipelineError::NoClauses);
        }

        let clauses = self
            .extraction
            .clauses_from_text(document.content_hash(), &extracted.text)
            .await
            .map_err(|e| PipelineError::ClassificationFailed(e.to_string()))?;

        if clauses.is_empty() {
            return Err(PipelineError::NoClauses);
        }

        // Best-effort: a missing index degrades clause summarization and
        // chat, it does not fail the job.
        if let Err(e) = self.retriever.index_document(document.id(), &clauses).await {
            tracing::warn!(
                "Retrieval indexing failed for document {}, continuing: {}",
                document.id(),
                e
            );
        }

        match mode {
            AnalysisMode::Eager => {
                let (document_summary, clause_summaries) = tokio::join!(
                    self.document_summarizer.summarize(&extracted.text),
                    self.summarize_clauses(document, &clauses),
                );

                Ok(PipelineOutput::Eager {
                    clause_summaries,
                    document_summary,
                })
            }
            AnalysisMode::Deferred => {
                let document_summary = self.document_summarizer.summarize(&extracted.text).await;

                Ok(PipelineOutput::Deferred {
                    total_clauses: clauses.len() as i32,
                    document_summary,
                })
            }
        }
    }

    /// Sliding-window clause summaries: concurrent within a batch,
    /// sequential across batches. Individual failures surface only as
    /// `is_failed` flags.
    async fn summarize_clauses(
        &self,
        document: &Document,
        clauses: &[Clause],
    ) -> Vec<ClauseSummary> {
        let mut summaries = Vec::with_capacity(clauses.len());

        for batch_start in (0..clauses.len()).step_by(CLAUSE_SUMMARY_BATCH_SIZE) {
            let batch_end = (batch_start + CLAUSE_SUMMARY_BATCH_SIZE).min(clauses.len());

            let outcomes = join_all((batch_start..batch_end).map(|i| {
                let clause = &clauses[i];
                let request = ClauseSummaryRequest {
                    document_id: Some(document.id()),
                    target_text: clause.text().to_string(),
                    prev_text: i
                        .checked_sub(1)
                        .map(|p| clauses[p].text().to_string()),
                    next_text: clauses.get(i + 1).map(|n| n.text().to_string()),
                };
                self.clause_summarizer.summarize(request)
            }))
            .await;

            for (i, outcome) in (batch_start..batch_end).zip(outcomes) {
                let clause = &clauses[i];
                summaries.push(ClauseSummary::new(
                    clause.clause_no(),
                    clause.category().clone(),
                    clause.text().to_string(),
                    outcome.summary_text,
                    outcome.failed,
                    self.clause_summarizer.model_version.clone(),
                    self.clause_summarizer.prompt_version.clone(),
                ));
            }
        }

        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    use crate::application::ports::clause_retriever::{RetrievalError, RetrievedClause};
    use crate::application::ports::text_extractor::{
        ExtractedText, TextExtractionError, TextExtractor,
    };
    use crate::application::ports::text_generator::{
        TextChunkStream, TextGenerator, TextGeneratorError,
    };
    use crate::application::ports::token_classifier::{TokenClassifier, TokenClassifierError};
    use crate::domain::repositories::ClauseCacheRepository;
    use crate::domain::repositories::clause_cache_repository::ClauseCacheError;
    use crate::domain::repositories::document_repository::DocumentRepositoryError;
    use crate::domain::value_objects::ContentHash;

    const DOCUMENT_TEXT: &str = "The Supplier shall deliver all goods on schedule.\n\n\
        The Customer shall pay all invoices within thirty days.\n\n\
        Either party may terminate this agreement upon material breach.";

    struct FixedExtractor {
        text: &'static str,
    }

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract(&self, _file_path: &str) -> Result<ExtractedText, TextExtractionError> {
            Ok(ExtractedText {
                text: self.text.to_string(),
                page_count: 1,
                skipped_pages: 0,
            })
        }
    }

    struct StubClassifier;

    #[async_trait]
    impl TokenClassifier for StubClassifier {
        async fn classify_tokens(
            &self,
            texts: &[String],
        ) -> Result<Vec<Vec<String>>, TokenClassifierError> {
            Ok(texts.iter().map(|_| vec!["Payment".to_string()]).collect())
        }

        async fn health_check(&self) -> Result<(), TokenClassifierError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct NoopCache {
        entries: Mutex<HashMap<String, Vec<Clause>>>,
    }

    #[async_trait]
    impl ClauseCacheRepository for NoopCache {
        async fn get(&self, hash: &ContentHash) -> Result<Option<Vec<Clause>>, ClauseCacheError> {
            Ok(self.entries.lock().unwrap().get(hash.as_str()).cloned())
        }

        async fn put(
            &self,
            hash: &ContentHash,
            clauses: &[Clause],
        ) -> Result<(), ClauseCacheError> {
            self.entries
                .lock()
                .unwrap()
                .insert(hash.as_str().to_string(), clauses.to_vec());
            Ok(())
        }
    }

    struct FlakyGenerator {
        calls: AtomicUsize,
        fail_all: bool,
        fail_on_contains: Option<&'static str>,
    }

    impl FlakyGenerator {
        fn reliable() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_all: false,
                fail_on_contains: None,
            }
        }

        fn failing_all() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_all: true,
                fail_on_contains: None,
            }
        }

        fn failing_when(marker: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_all: false,
                fail_on_contains: Some(marker),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let should_fail = self.fail_all
                || self
                    .fail_on_contains
                    .map(|marker| prompt.contains(marker))
                    .unwrap_or(false);
            if should_fail {
                Err(TextGeneratorError::GenerationFailed("injected".to_string()))
            } else {
                Ok("generated summary".to_string())
            }
        }

        async fn generate_stream(
            &self,
            _prompt: &str,
        ) -> Result<TextChunkStream, TextGeneratorError> {
            Err(TextGeneratorError::GenerationFailed("not used".to_string()))
        }
    }

    struct FailingRetriever;

    #[async_trait]
    impl ClauseRetriever for FailingRetriever {
        async fn index_document(
            &self,
            document_id: Uuid,
            _clauses: &[Clause],
        ) -> Result<(), RetrievalError> {
            Err(RetrievalError::StorageError(format!(
                "index write failed for {}",
                document_id
            )))
        }

        async fn retrieve(
            &self,
            document_id: Uuid,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<RetrievedClause>, RetrievalError> {
            Err(RetrievalError::IndexNotAvailable(document_id))
        }
    }

    #[derive(Default)]
    struct InMemoryDocuments {
        rows: Mutex<HashMap<Uuid, Document>>,
    }

    #[async_trait]
    impl DocumentRepository for InMemoryDocuments {
        async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(document.id(), document.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_hash(
            &self,
            _hash: &ContentHash,
        ) -> Result<Option<Document>, DocumentRepositoryError> {
            Ok(None)
        }

        async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
            self.save(document).await
        }

        async fn list(&self, _limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
            Ok(Vec::new())
        }
    }

    fn document() -> Document {
        Document::new(
            "msa.pdf".to_string(),
            "/uploads/msa.pdf".to_string(),
            1024,
            ContentHash::from_bytes(b"msa-bytes"),
        )
    }

    fn pipeline_with_documents(
        text: &'static str,
        generator: Arc<FlakyGenerator>,
        documents: Arc<InMemoryDocuments>,
    ) -> AnalysisPipelineService {
        let retriever: Arc<dyn ClauseRetriever> = Arc::new(FailingRetriever);
        let extraction = Arc::new(ClauseExtractionService::new(
            Arc::new(FixedExtractor { text }),
            Arc::new(StubClassifier),
            Arc::new(NoopCache::default()),
        ));
        let clause_summarizer = Arc::new(ClauseSummarizerService::new(
            generator.clone(),
            retriever.clone(),
            "llama3-legal-v1".to_string(),
            "v2.0-context-aware".to_string(),
        ));
        let document_summarizer = Arc::new(DocumentSummarizerService::new(generator));

        AnalysisPipelineService::new(
            extraction,
            retriever,
            clause_summarizer,
            document_summarizer,
            documents,
        )
    }

    fn pipeline(text: &'static str, generator: Arc<FlakyGenerator>) -> AnalysisPipelineService {
        pipeline_with_documents(text, generator, Arc::new(InMemoryDocuments::default()))
    }

    #[tokio::test]
    async fn test_eager_run_produces_all_clause_summaries() {
        let generator = Arc::new(FlakyGenerator::reliable());
        let pipeline = pipeline(DOCUMENT_TEXT, generator);

        let output = pipeline.run(&document(), AnalysisMode::Eager).await.unwrap();

        match output {
            PipelineOutput::Eager {
                clause_summaries,
                document_summary,
            } => {
                assert_eq!(clause_summaries.len(), 3);
                assert!(clause_summaries.iter().all(|s| !s.is_failed));
                assert_eq!(
                    clause_summaries.iter().map(|s| s.clause_no).collect::<Vec<_>>(),
                    vec![1, 2, 3]
                );
                assert_eq!(document_summary, "generated summary");
            }
            PipelineOutput::Deferred { .. } => panic!("expected eager output"),
        }
    }

    #[tokio::test]
    async fn test_too_short_document_fails_with_no_clauses() {
        let generator = Arc::new(FlakyGenerator::reliable());
        let pipeline = pipeline("tiny text", generator.clone());

        let result = pipeline.run(&document(), AnalysisMode::Eager).await;

        assert!(matches!(result, Err(PipelineError::NoClauses)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_clause_summaries_failed_still_returns_output() {
        let generator = Arc::new(FlakyGenerator::failing_all());
        let pipeline = pipeline(DOCUMENT_TEXT, generator);

        let output = pipeline.run(&document(), AnalysisMode::Eager).await.unwrap();

        match output {
            PipelineOutput::Eager {
                clause_summaries, ..
            } => {
                assert_eq!(clause_summaries.len(), 3);
                assert!(clause_summaries.iter().all(|s| s.is_failed));
            }
            PipelineOutput::Deferred { .. } => panic!("expected eager output"),
        }
    }

    #[tokio::test]
    async fn test_partial_clause_failure_is_isolated() {
        // Fails only the prompt where clause 2 is the quoted target, not the
        // prompts that carry it as window context.
        let generator = Arc::new(FlakyGenerator::failing_when("\"The Customer shall pay"));
        let pipeline = pipeline(DOCUMENT_TEXT, generator);

        let output = pipeline.run(&document(), AnalysisMode::Eager).await.unwrap();

        match output {
            PipelineOutput::Eager {
                clause_summaries, ..
            } => {
                assert_eq!(clause_summaries.len(), 3);
                let failed: Vec<i32> = clause_summaries
                    .iter()
                    .filter(|s| s.is_failed)
                    .map(|s| s.clause_no)
                    .collect();
                assert_eq!(failed, vec![2]);
                assert_eq!(
                    clause_summaries[1].summary_text,
                    crate::application::services::clause_summarizer::FALLBACK_CLAUSE_SUMMARY
                );
            }
            PipelineOutput::Deferred { .. } => panic!("expected eager output"),
        }
    }

    #[tokio::test]
    async fn test_deferred_mode_skips_clause_summaries() {
        let generator = Arc::new(FlakyGenerator::reliable());
        let pipeline = pipeline(DOCUMENT_TEXT, generator.clone());

        let output = pipeline
            .run(&document(), AnalysisMode::Deferred)
            .await
            .unwrap();

        match output {
            PipelineOutput::Deferred {
                total_clauses,
                document_summary,
            } => {
                assert_eq!(total_clauses, 3);
                assert_eq!(document_summary, "generated summary");
            }
            PipelineOutput::Eager { .. } => panic!("expected deferred output"),
        }
        // One chunk summary plus one merge; no clause prompts.
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_analysis_records_page_count() {
        let generator = Arc::new(FlakyGenerator::reliable());
        let documents = Arc::new(InMemoryDocuments::default());
        let pipeline = pipeline_with_documents(DOCUMENT_TEXT, generator, documents.clone());

        let document = document();
        documents.save(&document).await.unwrap();

        pipeline.run(&document, AnalysisMode::Eager).await.unwrap();

        let stored = documents.find_by_id(document.id()).await.unwrap().unwrap();
        assert_eq!(stored.page_count(), Some(1));
    }

    #[tokio::test]
    async fn test_index_failure_does_not_fail_the_job() {
        let generator = Arc::new(FlakyGenerator::reliable());
        let pipeline = pipeline(DOCUMENT_TEXT, generator);

        // FailingRetriever rejects every index write.
        let result = pipeline.run(&document(), AnalysisMode::Eager).await;
        assert!(result.is_ok());
    }
}
