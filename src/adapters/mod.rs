//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI chat completions (and a scripted mock)
//! - `booking` - Remote booking REST API
//! - `sqlite` - Guest and conversation persistence
//! - `http` - The axum chat endpoint and static files

pub mod ai;
pub mod booking;
pub mod http;
pub mod sqlite;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use booking::HttpRoomService;
pub use sqlite::{SqliteConversationRepository, SqliteUserRepository};
