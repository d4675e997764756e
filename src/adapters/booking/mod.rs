//! Booking API adapters.

mod http_room_service;

pub use http_room_service::HttpRoomService;
