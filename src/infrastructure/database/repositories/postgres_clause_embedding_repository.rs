use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::repositories::{
    ClauseEmbedding, ClauseEmbeddingRepository,
    clause_embedding_repository::ClauseEmbeddingRepositoryError,
};
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::ClauseEmbeddingModel;
use crate::infrastructure::database::schema::clause_embeddings;

pub struct PostgresClauseEmbeddingRepository {
    pool: DbPool,
}

impl PostgresClauseEmbeddingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<
        crate::infrastructure::database::connection::DbConnection,
        ClauseEmbeddingRepositoryError,
    > {
        get_connection_from_pool(&self.pool)
            .map_err(|e| ClauseEmbeddingRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl ClauseEmbeddingRepository for PostgresClauseEmbeddingRepository {
    /// Delete-then-insert inside one transaction: rebuilding a document's
    /// index overwrites it in place.
    async fn replace_for_document(
        &self,
        document_id: Uuid,
        embeddings: &[ClauseEmbedding],
    ) -> Result<(), ClauseEmbeddingRepositoryError> {
        let models: Vec<ClauseEmbeddingModel> =
            embeddings.iter().map(ClauseEmbeddingModel::from).collect();
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(
                    clause_embeddings::table.filter(clause_embeddings::document_id.eq(document_id)),
                )
                .execute(conn)?;

                diesel::insert_into(clause_embeddings::table)
                    .values(&models)
                    .execute(conn)?;

                Ok(())
            })
            .map_err(|e| {
                ClauseEmbeddingRepositoryError::DatabaseError(format!(
                    "Failed to replace index for document {}: {}",
                    document_id, e
                ))
            })
        })
        .await
        .map_err(|e| {
            ClauseEmbeddingRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(())
    }

    async fn find_by_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<ClauseEmbedding>, ClauseEmbeddingRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            clause_embeddings::table
                .filter(clause_embeddings::document_id.eq(document_id))
                .order(clause_embeddings::clause_no.asc())
                .load::<ClauseEmbeddingModel>(&mut conn)
                .map_err(|e| {
                    ClauseEmbeddingRepositoryError::DatabaseError(format!(
                        "Failed to load clause embeddings: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ClauseEmbeddingRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(models.into_iter().map(ClauseEmbedding::from).collect())
    }

    async fn count_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<i64, ClauseEmbeddingRepositoryError> {
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            clause_embeddings::table
                .filter(clause_embeddings::document_id.eq(document_id))
                .count()
                .get_result(&mut conn)
                .map_err(|e| {
                    ClauseEmbeddingRepositoryError::DatabaseError(format!(
                        "Failed to count clause embeddings: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ClauseEmbeddingRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })?
    }
}
