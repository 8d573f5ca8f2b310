use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ContentHash;

/// An uploaded contract document. Identified internally by UUID and
/// externally by its content hash, which stays stable across re-uploads of
/// identical bytes. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    file_name: String,
    file_path: String,
    file_size: i64,
    content_hash: ContentHash,
    page_count: Option<i32>,
    created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        file_name: String,
        file_path: String,
        file_size: i64,
        content_hash: ContentHash,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            file_path,
            file_size,
            content_hash,
            page_count: None,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from persisted values.
    pub fn from_database(
        id: Uuid,
        file_name: String,
        file_path: String,
        file_size: i64,
        content_hash: ContentHash,
        page_count: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_name,
            file_path,
            file_size,
            content_hash,
            page_count,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn page_count(&self) -> Option<i32> {
        self.page_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_page_count(&mut self, pages: i32) {
        self.page_count = Some(pages);
    }

    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }
}
