//! Top-level router: the chat API, static files, tracing and CORS.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::chat::{chat_routes, ChatAppState};

/// Builds the application router.
///
/// Requests that match no API route are served from `static_dir`, so
/// `GET /` returns its `index.html`.
pub fn app_router(state: ChatAppState, config: &ServerConfig) -> Router {
    let router = chat_routes()
        .with_state(state)
        .fallback_service(ServeDir::new(&config.static_dir));

    let router = match cors_layer(&config.cors_origins_list()) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// CORS for the configured origins; `None` when no valid origin is configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origins_means_no_cors_layer() {
        assert!(cors_layer(&[]).is_none());
    }

    #[test]
    fn invalid_origins_are_skipped() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
        assert!(cors_layer(&["https://hotel.example".to_string()]).is_some());
    }
}
