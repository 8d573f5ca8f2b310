pub mod clause_cache_model;
pub mod clause_embedding_model;
pub mod conversation_model;
pub mod document_model;
pub mod job_model;
pub mod message_model;

pub use clause_cache_model::ClauseCacheModel;
pub use clause_embedding_model::ClauseEmbeddingModel;
pub use conversation_model::ConversationModel;
pub use document_model::DocumentModel;
pub use job_model::{JobModel, UpdateJobModel};
pub use message_model::MessageModel;
