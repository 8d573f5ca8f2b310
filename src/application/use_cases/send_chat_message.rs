use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::text_generator::TextChunkStream;
use crate::application::services::ChatService;
use crate::application::services::chat_service::{ChatRequest, ChatResponse, ChatServiceError};
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};

#[derive(Debug)]
pub enum SendChatMessageError {
    DocumentNotFound(Uuid),
    EmptyMessage,
    ChatError(ChatServiceError),
    RepositoryError(String),
}

impl std::fmt::Display for SendChatMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendChatMessageError::DocumentNotFound(id) => {
                write!(f, "Document not found: {}", id)
            }
            SendChatMessageError::EmptyMessage => write!(f, "Message body is empty"),
            SendChatMessageError::ChatError(e) => write!(f, "{}", e),
            SendChatMessageError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SendChatMessageError {}

impl From<DocumentRepositoryError> for SendChatMessageError {
    fn from(error: DocumentRepositoryError) -> Self {
        SendChatMessageError::RepositoryError(error.to_string())
    }
}

impl From<ChatServiceError> for SendChatMessageError {
    fn from(error: ChatServiceError) -> Self {
        SendChatMessageError::ChatError(error)
    }
}

#[derive(Debug, Clone)]
pub struct SendChatMessageRequest {
    pub user_id: String,
    pub document_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub message: String,
}

/// Front door for chat: validates the document and message, then delegates
/// routing and generation to the conversation engine.
pub struct SendChatMessageUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chat_service: Arc<ChatService>,
}

impl SendChatMessageUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chat_service: Arc<ChatService>,
    ) -> Self {
        Self {
            document_repository,
            chat_service,
        }
    }

    pub async fn execute(
        &self,
        request: SendChatMessageRequest,
    ) -> Result<ChatResponse, SendChatMessageError> {
        let request = self.validate(request).await?;
        Ok(self.chat_service.respond(request).await?)
    }

    /// Streaming variant: returns the conversation id immediately plus the
    /// fragment stream; the engine persists the assembled assistant message
    /// once the stream completes.
    pub async fn execute_streaming(
        &self,
        request: SendChatMessageRequest,
    ) -> Result<(Uuid, TextChunkStream), SendChatMessageError> {
        let request = self.validate(request).await?;
        Ok(self.chat_service.respond_stream(request).await?)
    }

    async fn validate(
        &self,
        request: SendChatMessageRequest,
    ) -> Result<ChatRequest, SendChatMessageError> {
        if request.message.trim().is_empty() {
            return Err(SendChatMessageError::EmptyMessage);
        }

        self.document_repository
            .find_by_id(request.document_id)
            .await?
            .ok_or(SendChatMessageError::DocumentNotFound(request.document_id))?;

        Ok(ChatRequest {
            user_id: request.user_id,
            document_id: request.document_id,
            conversation_id: request.conversation_id,
            message: request.message,
        })
    }
}
