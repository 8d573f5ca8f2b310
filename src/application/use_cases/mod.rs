pub mod get_conversation;
pub mod get_job_status;
pub mod send_chat_message;
pub mod start_analysis;
pub mod suggest_questions;
pub mod summarize_clause;
pub mod upload_document;

pub use get_conversation::GetConversationUseCase;
pub use get_job_status::GetJobStatusUseCase;
pub use send_chat_message::SendChatMessageUseCase;
pub use start_analysis::StartAnalysisUseCase;
pub use suggest_questions::SuggestQuestionsUseCase;
pub use summarize_clause::SummarizeClauseUseCase;
pub use upload_document::UploadDocumentUseCase;
