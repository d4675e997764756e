//! Hotel Concierge - chat relay for a hotel booking assistant.
//!
//! Guest messages go to an OpenAI chat model that may call one of three
//! functions (list rooms, book a room, simulate a payment). Histories are
//! kept in SQLite; rooms and bookings come from a remote REST API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
