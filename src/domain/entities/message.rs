use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            _ => Err(format!("Unknown message role: {}", s)),
        }
    }
}

/// Citation attached to an assistant answer: a trimmed excerpt of the
/// retrieved clause plus enough metadata to locate it in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub excerpt: String,
    pub category: String,
    pub clause_no: i32,
}

/// One turn in a conversation. Append-only, ordered by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    conversation_id: Uuid,
    role: MessageRole,
    content: String,
    sources: Vec<SourceCitation>,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(conversation_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            role: MessageRole::User,
            content,
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(conversation_id: Uuid, content: String, sources: Vec<SourceCitation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            role: MessageRole::Assistant,
            content,
            sources,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from persisted values.
    pub fn from_database(
        id: Uuid,
        conversation_id: Uuid,
        role: MessageRole,
        content: String,
        sources: Vec<SourceCitation>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            role,
            content,
            sources,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sources(&self) -> &[SourceCitation] {
        &self.sources
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
