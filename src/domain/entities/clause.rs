use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ClauseCategory;

/// One classifiable, summarizable span of contract text. Clauses are created
/// once by segmentation + classification and never mutated; their ordering
/// within a document drives sliding-window context, so `clause_no` is a
/// 1-based contiguous sequence position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    clause_no: i32,
    category: ClauseCategory,
    text: String,
}

impl Clause {
    pub fn new(clause_no: i32, category: ClauseCategory, text: String) -> Self {
        Self {
            clause_no,
            category,
            text,
        }
    }

    pub fn clause_no(&self) -> i32 {
        self.clause_no
    }

    pub fn category(&self) -> &ClauseCategory {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Check that a clause sequence is numbered exactly 1..=N in order.
pub fn is_contiguous(clauses: &[Clause]) -> bool {
    clauses
        .iter()
        .enumerate()
        .all(|(i, c)| c.clause_no() == (i + 1) as i32)
}
