//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the concierge and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - chat completions with function calling
//! - `UserRepository` / `ConversationRepository` - guest state persistence
//! - `RoomService` - the remote booking API

mod ai_provider;
mod conversation_repository;
mod room_service;
mod user_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, FunctionCallMode,
    ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_repository::ConversationRepository;
pub use room_service::RoomService;
pub use user_repository::UserRepository;
