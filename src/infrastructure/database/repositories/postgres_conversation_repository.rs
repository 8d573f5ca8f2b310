use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::domain::repositories::{
    ConversationRepository, conversation_repository::ConversationRepositoryError,
};
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::ConversationModel;
use crate::infrastructure::database::schema::conversations;

pub struct PostgresConversationRepository {
    pool: DbPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<
        crate::infrastructure::database::connection::DbConnection,
        ConversationRepositoryError,
    > {
        get_connection_from_pool(&self.pool)
            .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationRepositoryError> {
        let model = ConversationModel::from(conversation);
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(conversations::table)
                .values(&model)
                .execute(&mut conn)
                .map_err(|e| {
                    ConversationRepositoryError::DatabaseError(format!(
                        "Failed to save conversation: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ConversationRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Conversation>, ConversationRepositoryError> {
        let mut conn = self.connection()?;

        let result = tokio::task::spawn_blocking(move || {
            conversations::table
                .filter(conversations::id.eq(id))
                .first::<ConversationModel>(&mut conn)
                .optional()
                .map_err(|e| {
                    ConversationRepositoryError::DatabaseError(format!(
                        "Failed to find conversation: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ConversationRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(result.map(Conversation::from))
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        document_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Conversation>, ConversationRepositoryError> {
        let user_id = user_id.to_string();
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            let mut query = conversations::table
                .filter(conversations::user_id.eq(user_id))
                .into_boxed();

            if let Some(document_id) = document_id {
                query = query.filter(conversations::document_id.eq(document_id));
            }

            query
                .order(conversations::updated_at.desc())
                .limit(limit)
                .load::<ConversationModel>(&mut conn)
                .map_err(|e| {
                    ConversationRepositoryError::DatabaseError(format!(
                        "Failed to list conversations: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ConversationRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(models.into_iter().map(Conversation::from).collect())
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), ConversationRepositoryError> {
        let model = ConversationModel::from(conversation);
        let id = conversation.id();
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::update(conversations::table.filter(conversations::id.eq(id)))
                .set(&model)
                .execute(&mut conn)
                .map_err(|e| {
                    ConversationRepositoryError::DatabaseError(format!(
                        "Failed to update conversation: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| {
            ConversationRepositoryError::DatabaseError(format!("Task join error: {}", e))
        })??;

        Ok(())
    }
}
