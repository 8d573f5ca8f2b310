use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/chat/messages", post(ChatHandler::send_message))
        .route("/chat/messages/stream", post(ChatHandler::stream_message))
        .route("/chat/conversations", get(ChatHandler::list_conversations))
        .route(
            "/chat/conversations/{conversation_id}/messages",
            get(ChatHandler::conversation_messages),
        )
        .with_state(handler)
}
