//! Room Service Port - Interface for the remote booking API.
//!
//! Failures never surface to callers: a failed listing is `[]` and a failed
//! booking is `None`. Implementations log the cause.

use async_trait::async_trait;

use crate::domain::concierge::{BookingConfirmation, BookingRequest, RoomListing};

/// Port for the hotel's booking service.
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Lists rooms as the service returns them; `[]` on any failure.
    async fn list_rooms(&self) -> RoomListing;

    /// Books a room; `None` on any failure.
    async fn book_room(&self, request: &BookingRequest) -> Option<BookingConfirmation>;
}
