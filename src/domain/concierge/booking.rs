//! Booking API payloads.
//!
//! The remote booking service owns the listing and confirmation schemas, so
//! both are carried as opaque JSON and handed to the model verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// The `GET /rooms` response body, whatever its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomListing(pub serde_json::Value);

impl RoomListing {
    /// The listing reported when the booking service could not be reached.
    pub fn empty() -> Self {
        Self(serde_json::Value::Array(Vec::new()))
    }

    /// Returns true for an empty array payload.
    pub fn is_empty(&self) -> bool {
        matches!(&self.0, serde_json::Value::Array(rooms) if rooms.is_empty())
    }
}

impl Default for RoomListing {
    fn default() -> Self {
        Self::empty()
    }
}

/// A booking confirmation as returned by the booking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingConfirmation(pub serde_json::Value);

/// Arguments of the `book_room` function, also the `POST /book` body.
///
/// `roomId` and `nights` are advertised as JSON numbers and forwarded as the
/// model wrote them, so `2.0` stays `2.0` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: Number,
    pub full_name: String,
    pub email: String,
    pub nights: Number,
}

impl BookingRequest {
    /// Creates a new booking request.
    pub fn new(
        room_id: impl Into<Number>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        nights: impl Into<Number>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            nights: nights.into(),
        }
    }
}
