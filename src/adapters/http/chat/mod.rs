//! Chat HTTP adapter - the single `POST /chat` endpoint.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse};
pub use handlers::{ChatApiError, ChatAppState, ChatPayload};
pub use routes::chat_routes;
