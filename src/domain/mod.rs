//! Domain layer - the concierge's vocabulary and pure rules.
//!
//! - `foundation` - identifiers, timestamps, error types
//! - `concierge` - users, chat history, callable functions, payment simulation

pub mod concierge;
pub mod foundation;
