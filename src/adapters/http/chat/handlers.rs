//! HTTP handlers for the chat endpoint.
//!
//! These handlers connect Axum routes to the chat command handler.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Json, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::{SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler};
use crate::domain::foundation::UserId;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub chat_handler: Arc<SendChatMessageHandler>,
}

impl ChatAppState {
    pub fn new(chat_handler: Arc<SendChatMessageHandler>) -> Self {
        Self { chat_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Extraction
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /chat`.
///
/// A request without a JSON content type or with an empty body reads as `{}`,
/// so it fails on the missing `userId` rather than on the framing. Anything
/// else must parse as a JSON object.
#[derive(Debug)]
pub struct ChatPayload(pub ChatRequest);

#[async_trait]
impl<S> FromRequest<S> for ChatPayload
where
    S: Send + Sync,
{
    type Rejection = ChatApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(ChatPayload(ChatRequest::default()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ChatApiError::BadRequest(rejection.body_text()))?;
        if bytes.is_empty() {
            return Ok(ChatPayload(ChatRequest::default()));
        }

        let Json(request) = Json::<ChatRequest>::from_bytes(&bytes)
            .map_err(|rejection| ChatApiError::BadRequest(rejection.body_text()))?;
        Ok(ChatPayload(request))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(mime) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
    else {
        return false;
    };
    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /chat - Send one guest message and get the concierge's reply.
///
/// # Errors
/// - 400 Bad Request: body is not a JSON object, or `userId` is missing or empty
/// - 500 Internal Server Error: store, model or function failure
pub async fn post_chat(
    State(state): State<ChatAppState>,
    ChatPayload(request): ChatPayload,
) -> Result<Json<ChatResponse>, ChatApiError> {

    let user_id = request
        .user_id
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| ChatApiError::BadRequest("userId is required".to_string()))?;

    tracing::info!(user_id = %user_id, message_len = request.message.len(), "Chat message received");

    let result = state
        .chat_handler
        .handle(SendChatMessageCommand::new(user_id, request.message))
        .await?;

    Ok(Json(ChatResponse {
        response: result.reply,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts chat failures to HTTP responses.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    Internal(String),
}

impl From<SendChatMessageError> for ChatApiError {
    fn from(err: SendChatMessageError) -> Self {
        ChatApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ChatApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal())
            }
        };

        (status, Json(error)).into_response()
    }
}
