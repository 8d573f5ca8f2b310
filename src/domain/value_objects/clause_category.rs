use serde::{Deserialize, Serialize};

/// Label assigned by the token-classification model. The label set is owned
/// by the model, so this stays an open string type rather than an enum; the
/// one label with in-crate meaning is the `Other` sentinel used when no
/// token carries an entity label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClauseCategory(String);

impl ClauseCategory {
    pub const OTHER: &'static str = "Other";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn is_other(&self) -> bool {
        self.0 == Self::OTHER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClauseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClauseCategory {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
