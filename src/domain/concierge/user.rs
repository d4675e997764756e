//! Guest record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A guest talking to the concierge.
///
/// Created the first time a `userId` shows up; afterwards only
/// `last_interaction` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub last_interaction: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a fresh user seen for the first time at `now`.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            full_name: None,
            email: None,
            last_interaction: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records an interaction and returns the stored timestamp.
    ///
    /// The stored value always moves forward, even if `now` does not.
    pub fn touch(&mut self, now: Timestamp) -> Timestamp {
        let at = now.strictly_after(&self.last_interaction);
        self.last_interaction = at;
        self.updated_at = at;
        at
    }
}
