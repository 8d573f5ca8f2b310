use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{Message, MessageRole, SourceCitation};
use crate::infrastructure::database::schema::messages;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(primary_key(id))]
pub struct MessageModel {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
    pub sources: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Message> for MessageModel {
    type Error = String;

    fn try_from(message: &Message) -> Result<Self, Self::Error> {
        Ok(Self {
            id: message.id(),
            conversation_id: message.conversation_id(),
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
            sources: serde_json::to_value(message.sources())
                .map_err(|e| format!("Failed to serialize sources: {}", e))?,
            created_at: message.created_at(),
        })
    }
}

impl TryFrom<MessageModel> for Message {
    type Error = String;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let role = MessageRole::from_str(&model.role)?;
        let sources: Vec<SourceCitation> = serde_json::from_value(model.sources)
            .map_err(|e| format!("Failed to parse sources: {}", e))?;

        Ok(Message::from_database(
            model.id,
            model.conversation_id,
            role,
            model.content,
            sources,
            model.created_at,
        ))
    }
}
