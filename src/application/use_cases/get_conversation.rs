use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::repositories::{
    ConversationRepository, MessageRepository,
    conversation_repository::ConversationRepositoryError,
    message_repository::MessageRepositoryError,
};

#[derive(Debug)]
pub enum GetConversationError {
    ConversationNotFound(Uuid),
    AccessDenied(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for GetConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetConversationError::ConversationNotFound(id) => {
                write!(f, "Conversation not found: {}", id)
            }
            GetConversationError::AccessDenied(id) => {
                write!(f, "Conversation {} belongs to another user", id)
            }
            GetConversationError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetConversationError {}

impl From<ConversationRepositoryError> for GetConversationError {
    fn from(error: ConversationRepositoryError) -> Self {
        GetConversationError::RepositoryError(error.to_string())
    }
}

impl From<MessageRepositoryError> for GetConversationError {
    fn from(error: MessageRepositoryError) -> Self {
        GetConversationError::RepositoryError(error.to_string())
    }
}

/// Read access to a user's chat threads and their ordered history.
pub struct GetConversationUseCase {
    conversation_repository: Arc<dyn ConversationRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetConversationUseCase {
    pub fn new(
        conversation_repository: Arc<dyn ConversationRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            conversation_repository,
            message_repository,
        }
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        document_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Conversation>, GetConversationError> {
        Ok(self
            .conversation_repository
            .find_by_user(user_id, document_id, limit)
            .await?)
    }

    pub async fn messages(
        &self,
        user_id: &str,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, GetConversationError> {
        let conversation = self
            .conversation_repository
            .find_by_id(conversation_id)
            .await?
            .ok_or(GetConversationError::ConversationNotFound(conversation_id))?;

        if !conversation.is_owned_by(user_id) {
            return Err(GetConversationError::AccessDenied(conversation_id));
        }

        Ok(self
            .message_repository
            .find_by_conversation(conversation_id)
            .await?)
    }
}
