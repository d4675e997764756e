//! Foundation module - Shared domain primitives.
//!
//! Contains the identifier, timestamp and error types that form the
//! vocabulary of the concierge domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
