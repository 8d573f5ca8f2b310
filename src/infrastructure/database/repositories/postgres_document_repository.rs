use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::{
    DocumentRepository, document_repository::DocumentRepositoryError,
};
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::DocumentModel;
use crate::infrastructure::database::schema::documents;

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::connection::DbConnection, DocumentRepositoryError>
    {
        get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let model = DocumentModel::from(document);
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(documents::table)
                .values(&model)
                .execute(&mut conn)
                .map_err(|e| {
                    DocumentRepositoryError::DatabaseError(format!("Failed to save document: {}", e))
                })
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let result = tokio::task::spawn_blocking(move || {
            documents::table
                .filter(documents::id.eq(id))
                .first::<DocumentModel>(&mut conn)
                .optional()
                .map_err(|e| {
                    DocumentRepositoryError::DatabaseError(format!("Failed to find document: {}", e))
                })
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        result
            .map(|model| {
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)
            })
            .transpose()
    }

    async fn find_by_hash(
        &self,
        hash: &ContentHash,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let hash = hash.to_string();
        let mut conn = self.connection()?;

        let result = tokio::task::spawn_blocking(move || {
            documents::table
                .filter(documents::content_hash.eq(hash))
                .first::<DocumentModel>(&mut conn)
                .optional()
                .map_err(|e| {
                    DocumentRepositoryError::DatabaseError(format!(
                        "Failed to find document by hash: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        result
            .map(|model| {
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)
            })
            .transpose()
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let model = DocumentModel::from(document);
        let id = document.id();
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::update(documents::table.filter(documents::id.eq(id)))
                .set((
                    documents::page_count.eq(model.page_count),
                    documents::file_path.eq(model.file_path),
                ))
                .execute(&mut conn)
                .map_err(|e| {
                    DocumentRepositoryError::DatabaseError(format!(
                        "Failed to update document: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            documents::table
                .order(documents::created_at.desc())
                .limit(limit)
                .load::<DocumentModel>(&mut conn)
                .map_err(|e| {
                    DocumentRepositoryError::DatabaseError(format!(
                        "Failed to list documents: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        models
            .into_iter()
            .map(|model| {
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)
            })
            .collect()
    }
}
