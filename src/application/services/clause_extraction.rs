use std::sync::Arc;

use crate::application::ports::text_extractor::{ExtractedText, TextExtractor};
use crate::application::ports::token_classifier::{NO_ENTITY_LABEL, TokenClassifier};
use crate::application::services::ClauseSegmenter;
use crate::domain::entities::Clause;
use crate::domain::repositories::ClauseCacheRepository;
use crate::domain::value_objects::{ClauseCategory, ContentHash};

/// Clauses are classified in batches of this size.
const CLASSIFIER_BATCH_SIZE: usize = 8;

#[derive(Debug)]
pub enum ClauseExtractionError {
    ExtractionError(String),
    ClassificationError(String),
}

impl std::fmt::Display for ClauseExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseExtractionError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            ClauseExtractionError::ClassificationError(msg) => {
                write!(f, "Classification error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ClauseExtractionError {}

/// Turns raw document text into the ordered, classified clause sequence,
/// going through the content-addressed cache so byte-identical re-analysis
/// never re-runs segmentation or classification.
pub struct ClauseExtractionService {
    text_extractor: Arc<dyn TextExtractor>,
    token_classifier: Arc<dyn TokenClassifier>,
    clause_cache: Arc<dyn ClauseCacheRepository>,
    segmenter: ClauseSegmenter,
}

impl ClauseExtractionService {
    pub fn new(
        text_extractor: Arc<dyn TextExtractor>,
        token_classifier: Arc<dyn TokenClassifier>,
        clause_cache: Arc<dyn ClauseCacheRepository>,
    ) -> Self {
        Self {
            text_extractor,
            token_classifier,
            clause_cache,
            segmenter: ClauseSegmenter::default(),
        }
    }

    pub async fn extract_text(
        &self,
        file_path: &str,
    ) -> Result<ExtractedText, ClauseExtractionError> {
        self.text_extractor
            .extract(file_path)
            .await
            .map_err(|e| ClauseExtractionError::ExtractionError(e.to_string()))
    }

    /// Cache-or-compute the clause sequence for already-extracted text.
    /// Cache reads and writes are best-effort; a cache outage degrades to
    /// recomputation, never to a failed job. A classifier failure fails the
    /// whole operation rather than silently mislabeling.
    pub async fn clauses_from_text(
        &self,
        content_hash: &ContentHash,
        text: &str,
    ) -> Result<Vec<Clause>, ClauseExtractionError> {
        match self.clause_cache.get(content_hash).await {
            Ok(Some(clauses)) => {
                tracing::debug!(
                    "Clause cache hit for {}: {} clauses",
                    content_hash,
                    clauses.len()
                );
                return Ok(clauses);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Clause cache read failed for {}: {}", content_hash, e);
            }
        }

        let texts = self.segmenter.segment(text);
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let categories = self.classify(&texts).await?;

        let clauses: Vec<Clause> = texts
            .into_iter()
            .zip(categories)
            .enumerate()
            .map(|(i, (text, category))| Clause::new((i + 1) as i32, category, text))
            .collect();

        if let Err(e) = self.clause_cache.put(content_hash, &clauses).await {
            tracing::warn!("Clause cache write failed for {}: {}", content_hash, e);
        }

        Ok(clauses)
    }

    async fn classify(
        &self,
        texts: &[String],
    ) -> Result<Vec<ClauseCategory>, ClauseExtractionError> {
        let mut categories = Vec::with_capacity(texts.len());

        for batch in texts.chunks(CLASSIFIER_BATCH_SIZE) {
            let token_labels = self
                .token_classifier
                .classify_tokens(batch)
                .await
                .map_err(|e| ClauseExtractionError::ClassificationError(e.to_string()))?;

            if token_labels.len() != batch.len() {
                return Err(ClauseExtractionError::ClassificationError(format!(
                    "Classifier returned {} results for a batch of {}",
                    token_labels.len(),
                    batch.len()
                )));
            }

            categories.extend(token_labels.iter().map(|labels| aggregate_label(labels)));
        }

        Ok(categories)
    }
}

/// Collapse per-token labels into one clause category: drop the no-entity
/// sentinel, take the majority label, break ties in favor of the label first
/// encountered in token order. All-sentinel input maps to `Other`.
pub fn aggregate_label<S: AsRef<str>>(token_labels: &[S]) -> ClauseCategory {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for label in token_labels {
        let label = label.as_ref();
        if label == NO_ENTITY_LABEL {
            continue;
        }
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(label, _)| ClauseCategory::new(*label))
        .unwrap_or_else(ClauseCategory::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::ports::text_extractor::TextExtractionError;
    use crate::application::ports::token_classifier::TokenClassifierError;
    use crate::domain::entities::clause::is_contiguous;
    use crate::domain::repositories::clause_cache_repository::ClauseCacheError;

    struct StubExtractor;

    #[async_trait]
    impl TextExtractor for StubExtractor {
        async fn extract(&self, _file_path: &str) -> Result<ExtractedText, TextExtractionError> {
            Ok(ExtractedText {
                text: String::new(),
                page_count: 0,
                skipped_pages: 0,
            })
        }
    }

    /// Labels every text "Payment" at the token level and counts calls.
    struct CountingClassifier {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingClassifier {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl TokenClassifier for CountingClassifier {
        async fn classify_tokens(
            &self,
            texts: &[String],
        ) -> Result<Vec<Vec<String>>, TokenClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TokenClassifierError::ServiceUnavailable(
                    "connection refused".to_string(),
                ));
            }
            Ok(texts
                .iter()
                .map(|_| vec!["Payment".to_string(), "O".to_string()])
                .collect())
        }

        async fn health_check(&self) -> Result<(), TokenClassifierError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct InMemoryCache {
        entries: Mutex<HashMap<String, Vec<Clause>>>,
    }

    #[async_trait]
    impl ClauseCacheRepository for InMemoryCache {
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

    fn service(classifier: Arc<CountingClassifier>) -> ClauseExtractionService {
        ClauseExtractionService::new(
            Arc::new(StubExtractor),
            classifier,
            Arc::new(InMemoryCache::default()),
        )
    }

    const CONTRACT_TEXT: &str = "The Supplier shall deliver goods on schedule.\n\n\
        The Customer shall pay invoices within thirty days.\n\n\
        Either party may terminate upon material breach by the other.";

    #[tokio::test]
    async fn test_clause_numbers_are_contiguous() {
        let classifier = Arc::new(CountingClassifier::new(false));
        let service = service(classifier);
        let hash = ContentHash::from_bytes(b"doc-1");

        let clauses = service
            .clauses_from_text(&hash, CONTRACT_TEXT)
            .await
            .unwrap();

        assert_eq!(clauses.len(), 3);
        assert!(is_contiguous(&clauses));
    }

    #[tokio::test]
    async fn test_second_run_hits_cache_and_skips_classifier() {
        let classifier = Arc::new(CountingClassifier::new(false));
        let service = service(classifier.clone());
        let hash = ContentHash::from_bytes(b"doc-1");

        let first = service
            .clauses_from_text(&hash, CONTRACT_TEXT)
            .await
            .unwrap();
        let calls_after_first = classifier.calls.load(Ordering::SeqCst);
        assert!(calls_after_first > 0);

        let second = service
            .clauses_from_text(&hash, CONTRACT_TEXT)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn test_classifier_failure_fails_the_operation() {
        let classifier = Arc::new(CountingClassifier::new(true));
        let service = service(classifier);
        let hash = ContentHash::from_bytes(b"doc-1");

        let result = service.clauses_from_text(&hash, CONTRACT_TEXT).await;
        assert!(matches!(
            result,
            Err(ClauseExtractionError::ClassificationError(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_text_yields_no_clauses_without_classification() {
        let classifier = Arc::new(CountingClassifier::new(false));
        let service = service(classifier.clone());
        let hash = ContentHash::from_bytes(b"empty");

        let clauses = service.clauses_from_text(&hash, "   ").await.unwrap();
        assert!(clauses.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_aggregate_majority_label() {
        let labels = ["Payment", "O", "Payment", "Termination"];
        assert_eq!(aggregate_label(&labels).as_str(), "Payment");
    }

    #[test]
    fn test_aggregate_tie_goes_to_first_encountered() {
        let labels = ["Termination", "Payment", "Payment", "Termination"];
        assert_eq!(aggregate_label(&labels).as_str(), "Termination");
    }

    #[test]
    fn test_aggregate_all_no_entity_is_other() {
        let labels = ["O", "O", "O"];
        assert!(aggregate_label(&labels).is_other());
        assert!(aggregate_label::<&str>(&[]).is_other());
    }
}
