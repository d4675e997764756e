//! User repository port.
//!
//! Guests are keyed by the externally supplied `userId`. They are created
//! lazily on first contact and never deleted.

use async_trait::async_trait;

use crate::domain::concierge::User;
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Repository port for guest records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the guest, creating it with `last_interaction = now` if absent.
    async fn get_or_create(&self, user_id: &UserId) -> Result<User, DomainError>;

    /// Sets the guest's last interaction time.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the guest does not exist
    /// - `DatabaseError` on persistence failure
    async fn touch(&self, user_id: &UserId, at: Timestamp) -> Result<(), DomainError>;
}
