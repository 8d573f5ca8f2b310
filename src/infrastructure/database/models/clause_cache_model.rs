use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::Clause;
use crate::infrastructure::database::schema::clause_cache_entries;

#[derive(Debug, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = clause_cache_entries)]
#[diesel(primary_key(content_hash))]
pub struct ClauseCacheModel {
    pub content_hash: String,
    pub clauses: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl ClauseCacheModel {
    pub fn new(content_hash: String, clauses: &[Clause]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content_hash,
            clauses: serde_json::to_value(clauses)?,
            updated_at: Utc::now(),
        })
    }

    pub fn into_clauses(self) -> Result<Vec<Clause>, serde_json::Error> {
        serde_json::from_value(self.clauses)
    }
}
