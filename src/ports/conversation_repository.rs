//! Conversation repository port.
//!
//! Defines the contract for loading and overwriting a guest's chat history.
//!
//! # Design
//!
//! - **Guest-scoped**: one logical conversation per `userId`
//! - **Whole-blob writes**: `save` replaces the full message sequence
//! - **No versioning**: last write wins; callers serialize per guest

use async_trait::async_trait;

use crate::domain::concierge::{ChatMessage, Conversation};
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for conversation persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns the guest's conversation, creating an empty one if absent.
    async fn get_or_create(&self, user_id: &UserId) -> Result<Conversation, DomainError>;

    /// Overwrites the guest's message history.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if no conversation exists for the guest
    /// - `DatabaseError` on persistence failure
    async fn save(&self, user_id: &UserId, messages: &[ChatMessage]) -> Result<(), DomainError>;
}
