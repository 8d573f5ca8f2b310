use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::chat_service::ChatResponse;
use crate::domain::entities::{Conversation, Message, SourceCitation};

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequestDto {
    pub user_id: String,
    pub document_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SourceCitationDto {
    pub excerpt: String,
    pub category: String,
    pub clause_no: i32,
}

impl From<&SourceCitation> for SourceCitationDto {
    fn from(citation: &SourceCitation) -> Self {
        Self {
            excerpt: citation.excerpt.clone(),
            category: citation.category.clone(),
            clause_no: citation.clause_no,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponseDto {
    pub conversation_id: Uuid,
    pub answer: String,
    pub sources: Vec<SourceCitationDto>,
}

impl From<ChatResponse> for ChatMessageResponseDto {
    fn from(response: ChatResponse) -> Self {
        Self {
            conversation_id: response.conversation_id,
            answer: response.answer,
            sources: response.sources.iter().map(SourceCitationDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub conversation_id: Uuid,
    pub user_id: String,
    pub document_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i32,
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            conversation_id: conversation.id(),
            user_id: conversation.user_id().to_string(),
            document_id: conversation.document_id(),
            title: conversation.title().to_string(),
            created_at: conversation.created_at(),
            updated_at: conversation.updated_at(),
            message_count: conversation.message_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub sources: Vec<SourceCitationDto>,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id(),
            conversation_id: message.conversation_id(),
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
            sources: message.sources().iter().map(SourceCitationDto::from).collect(),
            created_at: message.created_at(),
        }
    }
}
