pub mod postgres_clause_cache_repository;
pub mod postgres_clause_embedding_repository;
pub mod postgres_conversation_repository;
pub mod postgres_document_repository;
pub mod postgres_job_repository;
pub mod postgres_message_repository;

pub use postgres_clause_cache_repository::PostgresClauseCacheRepository;
pub use postgres_clause_embedding_repository::PostgresClauseEmbeddingRepository;
pub use postgres_conversation_repository::PostgresConversationRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_job_repository::PostgresJobRepository;
pub use postgres_message_repository::PostgresMessageRepository;
