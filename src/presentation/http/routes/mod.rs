pub mod chat_routes;
pub mod document_routes;
pub mod health_routes;
pub mod job_routes;

pub use chat_routes::chat_routes;
pub use document_routes::document_routes;
pub use health_routes::health_routes;
pub use job_routes::job_routes;
