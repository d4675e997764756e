//! SQLite adapters - Database implementations for repository ports.
//!
//! - `SqliteUserRepository` - Guest records
//! - `SqliteConversationRepository` - Chat histories stored as JSON text

mod conversation_repository;
mod pool;
mod user_repository;

pub use conversation_repository::SqliteConversationRepository;
pub use pool::{connect, connect_in_memory, run_migrations};
pub use user_repository::SqliteUserRepository;
