pub mod analysis_job;
pub mod clause;
pub mod clause_summary;
pub mod conversation;
pub mod document;
pub mod message;

pub use analysis_job::{AnalysisJob, AnalysisMode};
pub use clause::Clause;
pub use clause_summary::ClauseSummary;
pub use conversation::Conversation;
pub use document::Document;
pub use message::{Message, MessageRole, SourceCitation};
