//! Axum routes for the chat endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_chat, ChatAppState};

/// Creates the chat routes.
///
/// - POST /chat - Send a message, receive the concierge's reply
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/chat", post(post_chat))
}
