use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = documents)]
#[diesel(primary_key(id))]
pub struct DocumentModel {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_hash: String,
    pub page_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            file_name: document.file_name().to_string(),
            file_path: document.file_path().to_string(),
            file_size: document.file_size(),
            content_hash: document.content_hash().to_string(),
            page_count: document.page_count(),
            created_at: document.created_at(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let content_hash = ContentHash::new(model.content_hash)?;

        Ok(Document::from_database(
            model.id,
            model.file_name,
            model.file_path,
            model.file_size,
            content_hash,
            model.page_count,
            model.created_at,
        ))
    }
}
