use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::Clause;
use crate::domain::repositories::{
    ClauseCacheRepository, clause_cache_repository::ClauseCacheError,
};
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::ClauseCacheModel;
use crate::infrastructure::database::schema::clause_cache_entries;

pub struct PostgresClauseCacheRepository {
    pool: DbPool,
}

impl PostgresClauseCacheRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::connection::DbConnection, ClauseCacheError> {
        get_connection_from_pool(&self.pool)
            .map_err(|e| ClauseCacheError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl ClauseCacheRepository for PostgresClauseCacheRepository {
    async fn get(&self, hash: &ContentHash) -> Result<Option<Vec<Clause>>, ClauseCacheError> {
        let hash = hash.to_string();
        let mut conn = self.connection()?;

        let result = tokio::task::spawn_blocking(move || {
            clause_cache_entries::table
                .filter(clause_cache_entries::content_hash.eq(hash))
                .first::<ClauseCacheModel>(&mut conn)
                .optional()
                .map_err(|e| {
                    ClauseCacheError::DatabaseError(format!("Failed to read cache entry: {}", e))
                })
        })
        .await
        .map_err(|e| ClauseCacheError::DatabaseError(format!("Task join error: {}", e)))??;

        result
            .map(|model| {
                model
                    .into_clauses()
                    .map_err(|e| ClauseCacheError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    /// Upsert: the last write for a content hash wins. Concurrent analysis
    /// of identical bytes is safe though redundant.
    async fn put(&self, hash: &ContentHash, clauses: &[Clause]) -> Result<(), ClauseCacheError> {
        let model = ClauseCacheModel::new(hash.to_string(), clauses)
            .map_err(|e| ClauseCacheError::SerializationError(e.to_string()))?;
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(clause_cache_entries::table)
                .values(&model)
                .on_conflict(clause_cache_entries::content_hash)
                .do_update()
                .set((
                    clause_cache_entries::clauses.eq(&model.clauses),
                    clause_cache_entries::updated_at.eq(model.updated_at),
                ))
                .execute(&mut conn)
                .map_err(|e| {
                    ClauseCacheError::DatabaseError(format!("Failed to upsert cache entry: {}", e))
                })
        })
        .await
        .map_err(|e| ClauseCacheError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }
}
