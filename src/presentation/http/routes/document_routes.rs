use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/documents/upload", post(DocumentHandler::upload))
        .with_state(handler)
}
