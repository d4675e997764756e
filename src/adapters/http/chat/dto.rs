//! Data transfer objects for the chat endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The guest's message.
    #[serde(default)]
    pub message: String,
    /// Caller-chosen guest identifier; required and non-empty.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body for 400 and 500 replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// The only message clients see for internal failures.
    pub fn internal() -> Self {
        Self::new("An error occurred while processing your request.")
    }
}
