//! Per-guest serialization of chat turns.
//!
//! Two turns for the same guest would otherwise both load the same history
//! and the later save would drop the earlier turn.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::UserId;

type Table = HashMap<UserId, Arc<tokio::sync::Mutex<()>>>;

/// Table of async locks keyed by guest.
///
/// Entries are removed once no turn holds or waits on them.
#[derive(Debug, Default)]
pub struct UserLocks {
    table: Mutex<Table>,
}

impl UserLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `user_id` is running, then claims it.
    pub async fn acquire(&self, user_id: &UserId) -> UserLockGuard<'_> {
        let lock = Arc::clone(self.table().entry(user_id.clone()).or_default());
        let guard = lock.lock_owned().await;
        UserLockGuard {
            locks: self,
            user_id: user_id.clone(),
            guard: Some(guard),
        }
    }

    /// Number of guests with a live entry.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// Returns true if no guest has a live entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, user_id: &UserId) {
        let mut table = self.table();
        let idle = table
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            table.remove(user_id);
        }
    }
}

/// Held for the duration of one chat turn.
#[derive(Debug)]
pub struct UserLockGuard<'a> {
    locks: &'a UserLocks,
    user_id: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        // The owned guard keeps its Arc alive; drop it before checking for idleness.
        self.guard.take();
        self.locks.release(&self.user_id);
    }
}
