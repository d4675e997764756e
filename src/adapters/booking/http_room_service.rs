//! HTTP client for the remote booking API.
//!
//! Every failure (transport, non-2xx status, undecodable body) is logged and
//! collapsed into an empty listing or a missing confirmation. The model is
//! told "no rooms" rather than the request failing. Successful payloads are
//! forwarded whatever their shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::concierge::{BookingConfirmation, BookingRequest, RoomListing};
use crate::ports::RoomService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a single booking API call, logged and never propagated.
#[derive(Debug, thiserror::Error)]
enum BookingApiError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// RoomService backed by `GET {base}/rooms` and `POST {base}/book`.
#[derive(Debug, Clone)]
pub struct HttpRoomService {
    client: Client,
    base_url: String,
}

impl HttpRoomService {
    /// Creates a client for the booking API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a service around an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BookingApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BookingApiError::Status { status, body });
        }
        response.json::<T>().await.map_err(BookingApiError::Decode)
    }

    async fn fetch_rooms(&self) -> Result<RoomListing, BookingApiError> {
        let response = self
            .client
            .get(self.url("rooms"))
            .send()
            .await
            .map_err(BookingApiError::Transport)?;
        Self::decode(response).await
    }

    async fn post_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BookingApiError> {
        let response = self
            .client
            .post(self.url("book"))
            .json(request)
            .send()
            .await
            .map_err(BookingApiError::Transport)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl RoomService for HttpRoomService {
    async fn list_rooms(&self) -> RoomListing {
        match self.fetch_rooms().await {
            Ok(listing) => {
                tracing::debug!(empty = listing.is_empty(), "Fetched rooms");
                listing
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching rooms");
                RoomListing::empty()
            }
        }
    }

    async fn book_room(&self, request: &BookingRequest) -> Option<BookingConfirmation> {
        match self.post_booking(request).await {
            Ok(confirmation) => {
                tracing::info!(room_id = %request.room_id, nights = %request.nights, "Room booked");
                Some(confirmation)
            }
            Err(e) => {
                tracing::error!(room_id = %request.room_id, error = %e, "Error booking room");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn list_rooms_returns_payload_verbatim() {
        let rooms = serde_json::json!([
            {"id": 1, "name": "Deluxe", "price": 120},
            {"id": 2, "name": "Suite", "price": 300, "extras": ["spa"]}
        ]);
        let body = rooms.clone();
        let url = serve(Router::new().route("/rooms", get(move || async move { Json(body) }))).await;

        let listed = HttpRoomService::new(url).unwrap().list_rooms().await;

        assert_eq!(listed, RoomListing(rooms));
    }

    #[tokio::test]
    async fn list_rooms_forwards_object_payload_unchanged() {
        let payload = serde_json::json!({"rooms": [{"id": 1}], "total": 1});
        let body = payload.clone();
        let url = serve(Router::new().route("/rooms", get(move || async move { Json(body) }))).await;

        let listed = HttpRoomService::new(url).unwrap().list_rooms().await;

        assert_eq!(listed, RoomListing(payload));
        assert!(!listed.is_empty());
    }

    #[tokio::test]
    async fn list_rooms_is_empty_on_server_error() {
        let url = serve(Router::new().route(
            "/rooms",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        assert!(HttpRoomService::new(url).unwrap().list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn list_rooms_is_empty_on_undecodable_body() {
        let url = serve(Router::new().route("/rooms", get(|| async { "not json" }))).await;

        assert!(HttpRoomService::new(url).unwrap().list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn list_rooms_is_empty_when_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        assert!(HttpRoomService::new(url).unwrap().list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn book_room_posts_camel_case_body() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let url = serve(Router::new().route(
            "/book",
            post(move |Json(body): Json<serde_json::Value>| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = Some(body);
                    Json(serde_json::json!({"bookingId": "B-1", "status": "confirmed"}))
                }
            }),
        ))
        .await;

        let confirmation = HttpRoomService::new(format!("{}/", url))
            .unwrap()
            .book_room(&BookingRequest::new(12, "Ann Lee", "ann@x.com", 2))
            .await;

        assert_eq!(
            confirmation,
            Some(BookingConfirmation(
                serde_json::json!({"bookingId": "B-1", "status": "confirmed"})
            ))
        );
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(serde_json::json!({"roomId": 12, "fullName": "Ann Lee", "email": "ann@x.com", "nights": 2}))
        );
    }

    #[tokio::test]
    async fn book_room_forwards_fractional_numbers_as_written() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let url = serve(Router::new().route(
            "/book",
            post(move |body: String| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = Some(body);
                    Json(serde_json::json!({"status": "confirmed"}))
                }
            }),
        ))
        .await;
        let request: BookingRequest = serde_json::from_str(
            r#"{"roomId":12.0,"fullName":"Ann Lee","email":"ann@x.com","nights":2.5}"#,
        )
        .unwrap();

        let confirmation = HttpRoomService::new(url).unwrap().book_room(&request).await;

        assert!(confirmation.is_some());
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            r#"{"roomId":12.0,"fullName":"Ann Lee","email":"ann@x.com","nights":2.5}"#
        );
    }

    #[tokio::test]
    async fn book_room_is_none_on_rejection() {
        let url = serve(Router::new().route(
            "/book",
            post(|| async { (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": "full"}))) }),
        ))
        .await;

        let confirmation = HttpRoomService::new(url)
            .unwrap()
            .book_room(&BookingRequest::new(1, "Ann Lee", "ann@x.com", 1))
            .await;

        assert!(confirmation.is_none());
    }
}
