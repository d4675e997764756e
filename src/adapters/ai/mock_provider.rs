//! Mock AI Provider for testing.
//!
//! Replays a queue of scripted replies (text, function calls or errors) and
//! records every request, so orchestration tests can assert on exactly what
//! the model was shown.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_function_call("get_rooms", "{}")
//!     .with_response("Here are the rooms.");
//!
//! let first = provider.complete(request).await?;
//! assert!(first.function_call.is_some());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::concierge::FunctionCall;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Reply with text.
    Text { content: String, usage: TokenUsage },
    /// Ask for a function call.
    FunctionCall { call: FunctionCall, usage: TokenUsage },
    /// Fail.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate context too long.
    ContextTooLong,
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong => AIError::ContextTooLong,
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1").with_functions(true),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a text response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Text {
            content: content.into(),
            usage: TokenUsage::new(10, 20, 1),
        })
    }

    /// Adds a function-call response to the queue.
    pub fn with_function_call(self, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        self.push(MockResponse::FunctionCall {
            call: FunctionCall::new(name, arguments),
            usage: TokenUsage::new(15, 5, 1),
        })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Adds any response to the queue.
    pub fn push(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text {
                content: "Mock response".to_string(),
                usage: TokenUsage::new(5, 10, 1),
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.info.model.clone());
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text { content, usage } => {
                Ok(CompletionResponse::text(content, model).with_usage(usage))
            }
            MockResponse::FunctionCall { call, usage } => {
                Ok(CompletionResponse::function_call(call, model).with_usage(usage))
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
