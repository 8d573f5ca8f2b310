pub mod chat_handler;
pub mod document_handler;
pub mod job_handler;

pub use chat_handler::ChatHandler;
pub use document_handler::DocumentHandler;
pub use job_handler::JobHandler;
