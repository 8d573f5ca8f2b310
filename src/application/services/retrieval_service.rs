use std::sync::Arc;

use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::application::ports::clause_retriever::{
    ClauseRetriever, RetrievalError, RetrievedClause,
};
use crate::application::ports::embedding_provider::{BatchEmbeddingRequest, EmbeddingProvider, EmbeddingRequest};
use crate::domain::entities::Clause;
use crate::domain::repositories::{ClauseEmbedding, ClauseEmbeddingRepository};

/// Clause texts are embedded in batches of this size when indexing.
const EMBEDDING_BATCH_SIZE: usize = 10;

/// Vector index over a document's clauses: embeds clause texts on indexing,
/// embeds the query on lookup, and ranks by cosine similarity. Rebuilding a
/// document's index overwrites it in place.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_repository: Arc<dyn ClauseEmbeddingRepository>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        embedding_repository: Arc<dyn ClauseEmbeddingRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            embedding_repository,
        }
    }
}

#[async_trait]
impl ClauseRetriever for RetrievalService {
    async fn index_document(
        &self,
        document_id: Uuid,
        clauses: &[Clause],
    ) -> Result<(), RetrievalError> {
        let mut entries = Vec::with_capacity(clauses.len());

        for batch in clauses.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text().to_string()).collect();

            let response = self
                .embedding_provider
                .generate_embeddings(BatchEmbeddingRequest { texts })
                .await
                .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(RetrievalError::EmbeddingError(format!(
                    "Provider returned {} embeddings for a batch of {}",
                    response.embeddings.len(),
                    batch.len()
                )));
            }

            for (clause, vector) in batch.iter().zip(response.embeddings) {
                entries.push(ClauseEmbedding::new(
                    document_id,
                    clause.clause_no(),
                    clause.category().clone(),
                    clause.text().to_string(),
                    vector,
                ));
            }
        }

        self.embedding_repository
            .replace_for_document(document_id, &entries)
            .await
            .map_err(|e| RetrievalError::StorageError(e.to_string()))?;

        tracing::info!(
            "Indexed {} clauses for document {}",
            entries.len(),
            document_id
        );
        Ok(())
    }

    async fn retrieve(
        &self,
        document_id: Uuid,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedClause>, RetrievalError> {
        let query_vector = self
            .embedding_provider
            .generate_embedding(EmbeddingRequest {
                text: query.to_string(),
            })
            .await
            .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

        let entries = self
            .embedding_repository
            .find_by_document(document_id)
            .await
            .map_err(|e| RetrievalError::StorageError(e.to_string()))?;

        if entries.is_empty() {
            return Err(RetrievalError::IndexNotAvailable(document_id));
        }

        let mut ranked: Vec<RetrievedClause> = entries
            .into_iter()
            .map(|entry| RetrievedClause {
                clause_no: entry.clause_no,
                category: entry.category,
                text: entry.clause_text,
                similarity: cosine_similarity(&query_vector, &entry.embedding),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k);

        Ok(ranked)
    }
}

fn cosine_similarity(a: &Vector, b: &Vector) -> f32 {
    let a_slice = a.as_slice();
    let b_slice = b.as_slice();

    if a_slice.len() != b_slice.len() {
        return 0.0;
    }

    let dot_product: f32 = a_slice.iter().zip(b_slice.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a_slice.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b_slice.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
