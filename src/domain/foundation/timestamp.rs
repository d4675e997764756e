//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of microseconds.
    pub fn plus_micros(&self, micros: i64) -> Self {
        Self(self.0 + Duration::microseconds(micros))
    }

    /// Returns `self` if it is after `previous`, otherwise the smallest
    /// representable step past `previous`.
    ///
    /// Keeps per-record timestamps strictly increasing even when the clock
    /// reads the same value twice or steps backwards.
    pub fn strictly_after(self, previous: &Timestamp) -> Self {
        if self.is_after(previous) {
            self
        } else {
            previous.plus_micros(1)
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
