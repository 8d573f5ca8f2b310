use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Message;
use crate::domain::repositories::{MessageRepository, message_repository::MessageRepositoryError};
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::MessageModel;
use crate::infrastructure::database::schema::messages;

pub struct PostgresMessageRepository {
    pool: DbPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<crate::infrastructure::database::connection::DbConnection, MessageRepositoryError>
    {
        get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn save(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let model =
            MessageModel::try_from(message).map_err(MessageRepositoryError::ValidationError)?;
        let mut conn = self.connection()?;

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(messages::table)
                .values(&model)
                .execute(&mut conn)
                .map_err(|e| {
                    MessageRepositoryError::DatabaseError(format!("Failed to save message: {}", e))
                })
        })
        .await
        .map_err(|e| MessageRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        Ok(())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            messages::table
                .filter(messages::conversation_id.eq(conversation_id))
                .order(messages::created_at.asc())
                .load::<MessageModel>(&mut conn)
                .map_err(|e| {
                    MessageRepositoryError::DatabaseError(format!("Failed to load messages: {}", e))
                })
        })
        .await
        .map_err(|e| MessageRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        models
            .into_iter()
            .map(|model| Message::try_from(model).map_err(MessageRepositoryError::ValidationError))
            .collect()
    }

    async fn find_recent(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.connection()?;

        let models = tokio::task::spawn_blocking(move || {
            messages::table
                .filter(messages::conversation_id.eq(conversation_id))
                .order(messages::created_at.desc())
                .limit(limit)
                .load::<MessageModel>(&mut conn)
                .map_err(|e| {
                    MessageRepositoryError::DatabaseError(format!(
                        "Failed to load recent messages: {}",
                        e
                    ))
                })
        })
        .await
        .map_err(|e| MessageRepositoryError::DatabaseError(format!("Task join error: {}", e)))??;

        // Loaded newest-first; return chronological.
        let mut result: Vec<Message> = models
            .into_iter()
            .map(|model| Message::try_from(model).map_err(MessageRepositoryError::ValidationError))
            .collect::<Result<_, _>>()?;
        result.reverse();

        Ok(result)
    }
}
