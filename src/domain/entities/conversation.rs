use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum title length derived from the first user message.
const TITLE_MAX_CHARS: usize = 50;

/// A chat thread between one user and one document. Owned exclusively by
/// the creating user; mutated only by appending messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: Uuid,
    user_id: String,
    document_id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    message_count: i32,
}

impl Conversation {
    pub fn new(user_id: String, document_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            document_id,
            title: "New Conversation".to_string(),
            created_at: now,
            updated_at: now,
            message_count: 0,
        }
    }

    /// Reconstruct from persisted values.
    pub fn from_database(
        id: Uuid,
        user_id: String,
        document_id: Uuid,
        title: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        message_count: i32,
    ) -> Self {
        Self {
            id,
            user_id,
            document_id,
            title,
            created_at,
            updated_at,
            message_count,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn message_count(&self) -> i32 {
        self.message_count
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Record an appended message. The first user message derives the
    /// conversation title.
    pub fn record_message(&mut self, is_user: bool, content: &str) {
        if is_user && self.message_count == 0 {
            self.title = derive_title(content);
        }
        self.message_count += 1;
        self.updated_at = Utc::now();
    }
}

fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let cut: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_user_message() {
        let mut conversation = Conversation::new("user-1".to_string(), Uuid::new_v4());
        assert_eq!(conversation.title(), "New Conversation");

        conversation.record_message(true, "What are the payment terms?");
        assert_eq!(conversation.title(), "What are the payment terms?");
        assert_eq!(conversation.message_count(), 1);

        conversation.record_message(false, "The payment terms are net 30.");
        conversation.record_message(true, "And the late fees?");
        assert_eq!(conversation.title(), "What are the payment terms?");
        assert_eq!(conversation.message_count(), 3);
    }

    #[test]
    fn test_long_title_truncated() {
        let mut conversation = Conversation::new("user-1".to_string(), Uuid::new_v4());
        let long = "a".repeat(80);
        conversation.record_message(true, &long);

        assert_eq!(conversation.title().chars().count(), 53);
        assert!(conversation.title().ends_with("..."));
    }

    #[test]
    fn test_assistant_first_message_keeps_default_title() {
        let mut conversation = Conversation::new("user-1".to_string(), Uuid::new_v4());
        conversation.record_message(false, "Hello! How can I help?");
        assert_eq!(conversation.title(), "New Conversation");
    }

    #[test]
    fn test_ownership() {
        let conversation = Conversation::new("user-1".to_string(), Uuid::new_v4());
        assert!(conversation.is_owned_by("user-1"));
        assert!(!conversation.is_owned_by("user-2"));
    }
}
