use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::repositories::ClauseEmbedding;
use crate::domain::value_objects::ClauseCategory;
use crate::infrastructure::database::schema::clause_embeddings;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = clause_embeddings)]
#[diesel(primary_key(id))]
pub struct ClauseEmbeddingModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub clause_no: i32,
    pub category: String,
    pub clause_text: String,
    pub embedding: Vector,
}

impl From<&ClauseEmbedding> for ClauseEmbeddingModel {
    fn from(entry: &ClauseEmbedding) -> Self {
        Self {
            id: entry.id,
            document_id: entry.document_id,
            clause_no: entry.clause_no,
            category: entry.category.as_str().to_string(),
            clause_text: entry.clause_text.clone(),
            embedding: entry.embedding.clone(),
        }
    }
}

impl From<ClauseEmbeddingModel> for ClauseEmbedding {
    fn from(model: ClauseEmbeddingModel) -> Self {
        Self {
            id: model.id,
            document_id: model.document_id,
            clause_no: model.clause_no,
            category: ClauseCategory::new(model.category),
            clause_text: model.clause_text,
            embedding: model.embedding,
        }
    }
}
