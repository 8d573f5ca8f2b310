use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use crate::infrastructure::database::schema::conversations;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = conversations)]
#[diesel(primary_key(id))]
pub struct ConversationModel {
    pub id: Uuid,
    pub user_id: String,
    pub document_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i32,
}

impl From<&Conversation> for ConversationModel {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id(),
            user_id: conversation.user_id().to_string(),
            document_id: conversation.document_id(),
            title: conversation.title().to_string(),
            created_at: conversation.created_at(),
            updated_at: conversation.updated_at(),
            message_count: conversation.message_count(),
        }
    }
}

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation::from_database(
            model.id,
            model.user_id,
            model.document_id,
            model.title,
            model.created_at,
            model.updated_at,
            model.message_count,
        )
    }
}
