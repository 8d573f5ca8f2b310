use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Sse, sse::Event, sse::KeepAlive},
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::application::services::chat_service::ChatServiceError;
use crate::application::use_cases::send_chat_message::{
    SendChatMessageError, SendChatMessageRequest,
};
use crate::application::use_cases::{GetConversationUseCase, SendChatMessageUseCase};
use crate::presentation::http::dto::{
    ApiResponse, ChatMessageRequestDto, ChatMessageResponseDto, ConversationDto, MessageDto,
};

#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
    pub user_id: String,
    pub document_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationMessagesQuery {
    pub user_id: String,
}

pub struct ChatHandler {
    send_chat_message_use_case: Arc<SendChatMessageUseCase>,
    get_conversation_use_case: Arc<GetConversationUseCase>,
}

impl ChatHandler {
    pub fn new(
        send_chat_message_use_case: Arc<SendChatMessageUseCase>,
        get_conversation_use_case: Arc<GetConversationUseCase>,
    ) -> Self {
        Self {
            send_chat_message_use_case,
            get_conversation_use_case,
        }
    }

    pub async fn send_message(
        State(handler): State<Arc<ChatHandler>>,
        Json(request): Json<ChatMessageRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = SendChatMessageRequest {
            user_id: request.user_id,
            document_id: request.document_id,
            conversation_id: request.conversation_id,
            message: request.message,
        };

        match handler.send_chat_message_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ChatMessageResponseDto::from(response))),
            )),
            Err(e) => {
                let (status, code) = chat_error_status(&e);
                Ok((status, Json(ApiResponse::error(code, e.to_string()))))
            }
        }
    }

    /// Streaming variant: SSE `message` events carry text fragments, and a
    /// final `done` event carries the conversation id once the assistant
    /// message has been persisted.
    pub async fn stream_message(
        State(handler): State<Arc<ChatHandler>>,
        Json(request): Json<ChatMessageRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let request = SendChatMessageRequest {
            user_id: request.user_id,
            document_id: request.document_id,
            conversation_id: request.conversation_id,
            message: request.message,
        };

        let (conversation_id, fragments) = handler
            .send_chat_message_use_case
            .execute_streaming(request)
            .await
            .map_err(|e| match chat_error_status(&e) {
                (status, _) => status,
            })?;

        let events = fragments
            .map(|fragment| -> Result<Event, Infallible> {
                match fragment {
                    Ok(text) => Ok(Event::default().event("message").data(text)),
                    Err(e) => Ok(Event::default().event("error").data(e.to_string())),
                }
            })
            .chain(futures::stream::once(async move {
                Ok(Event::default()
                    .event("done")
                    .data(json!({ "conversation_id": conversation_id }).to_string()))
            }));

        Ok(Sse::new(events)
            .keep_alive(
                KeepAlive::new()
                    .interval(Duration::from_secs(30))
                    .text("keep-alive"),
            )
            .into_response())
    }

    pub async fn list_conversations(
        State(handler): State<Arc<ChatHandler>>,
        Query(query): Query<ListConversationsQuery>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .get_conversation_use_case
            .list_for_user(&query.user_id, query.document_id, query.limit.unwrap_or(50))
            .await
        {
            Ok(conversations) => {
                let dtos: Vec<ConversationDto> =
                    conversations.iter().map(ConversationDto::from).collect();
                Ok((StatusCode::OK, Json(ApiResponse::success(dtos))))
            }
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("FETCH_FAILED", e.to_string())),
            )),
        }
    }

    pub async fn conversation_messages(
        State(handler): State<Arc<ChatHandler>>,
        Path(conversation_id): Path<Uuid>,
        Query(query): Query<ConversationMessagesQuery>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .get_conversation_use_case
            .messages(&query.user_id, conversation_id)
            .await
        {
            Ok(messages) => {
                let dtos: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();
                Ok((StatusCode::OK, Json(ApiResponse::success(dtos))))
            }
            Err(e) => Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("CONVERSATION_NOT_FOUND", e.to_string())),
            )),
        }
    }
}

fn chat_error_status(error: &SendChatMessageError) -> (StatusCode, &'static str) {
    match error {
        SendChatMessageError::DocumentNotFound(_) => (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND"),
        SendChatMessageError::EmptyMessage => (StatusCode::BAD_REQUEST, "EMPTY_MESSAGE"),
        SendChatMessageError::ChatError(ChatServiceError::ConversationNotFound(_)) => {
            (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND")
        }
        SendChatMessageError::ChatError(ChatServiceError::AccessDenied(_)) => {
            (StatusCode::FORBIDDEN, "ACCESS_DENIED")
        }
        SendChatMessageError::ChatError(ChatServiceError::RetrievalFailed(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "RETRIEVAL_UNAVAILABLE")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_FAILED"),
    }
}
