use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ClauseCategory;

/// One-sentence summary of a single clause, produced once per clause per
/// job. `is_failed` marks placeholder text from a failed generation call so
/// consumers can tell real summaries from fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseSummary {
    pub clause_no: i32,
    pub category: ClauseCategory,
    pub original_text: String,
    pub summary_text: String,
    pub is_failed: bool,
    pub model_version: String,
    pub prompt_version: String,
}

impl ClauseSummary {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clause_no: i32,
        category: ClauseCategory,
        original_text: String,
        summary_text: String,
        is_failed: bool,
        model_version: String,
        prompt_version: String,
    ) -> Self {
        Self {
            clause_no,
            category,
            original_text,
            summary_text,
            is_failed,
            model_version,
            prompt_version,
        }
    }
}
