use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Message;

#[derive(Debug)]
pub enum MessageRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for MessageRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            MessageRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MessageRepositoryError {}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn save(&self, message: &Message) -> Result<(), MessageRepositoryError>;
    /// Chronological order (oldest first).
    async fn find_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError>;
    /// The last `limit` messages, returned in chronological order.
    async fn find_recent(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, MessageRepositoryError>;
}
