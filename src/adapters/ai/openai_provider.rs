//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions API.
//!
//! Uses the `functions` / `function_call` request fields so the model can ask
//! for one of the concierge functions instead of answering in text.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-3.5-turbo")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::concierge::{ChatMessage, FunctionCall};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, FunctionCallMode,
    ProviderInfo, TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model used when a request does not name one.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 0,
        }
    }

    /// Sets the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Timeout in whole seconds, saturating at `u32::MAX`.
    fn timeout_secs(&self) -> u32 {
        u32::try_from(self.timeout.as_secs()).unwrap_or(u32::MAX)
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError::InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Resolves the model for a request.
    fn model_for<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let functions: Vec<serde_json::Value> = request
            .functions
            .iter()
            .map(|f| f.to_openai_format())
            .collect();

        // function_call is only meaningful alongside declared functions
        let function_call = if functions.is_empty() {
            None
        } else {
            Some(request.function_call.unwrap_or(FunctionCallMode::Auto))
        };

        OpenAIRequest {
            model: self.model_for(request).to_string(),
            messages: request.prompt_messages(),
            functions,
            function_call,
        }
    }

    /// Sends a request and handles the response.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(AIError::AuthenticationFailed),
            429 => {
                let retry_after = Self::parse_retry_after(&error_body);
                Err(AIError::rate_limited(retry_after))
            }
            400 => {
                if error_body.contains("maximum context length")
                    || error_body.contains("context_length_exceeded")
                {
                    Err(AIError::ContextTooLong)
                } else {
                    Err(AIError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from error response.
    ///
    /// OpenAI sometimes says "try again in Xs" in the error message; 30 seconds otherwise.
    fn parse_retry_after(error_body: &str) -> u32 {
        serde_json::from_str::<serde_json::Value>(error_body)
            .ok()
            .and_then(|parsed| {
                let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
                let idx = message.find("try again in ")?;
                let rest = &message[idx + 13..];
                let end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                rest[..end].parse::<u32>().ok()
            })
            .unwrap_or(30)
    }

    /// Parses a completion response.
    async fn parse_response(
        &self,
        response: Response,
        requested_model: &str,
    ) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some("function_call") => FinishReason::FunctionCall,
            _ if choice.message.function_call.is_some() => FinishReason::FunctionCall,
            _ => FinishReason::Stop,
        };

        let model = openai_response
            .model
            .unwrap_or_else(|| requested_model.to_string());

        let usage = openai_response
            .usage
            .map(|u| {
                TokenUsage::new(
                    u.prompt_tokens,
                    u.completion_tokens,
                    Self::calculate_cost(&model, u.prompt_tokens, u.completion_tokens),
                )
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content,
            function_call: choice.message.function_call,
            usage,
            model,
            finish_reason,
        })
    }

    /// Calculates estimated cost in cents based on model and token counts.
    fn calculate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> u32 {
        // Prices per 1M tokens (in cents)
        let (prompt_price, completion_price) = match model {
            m if m.starts_with("gpt-4-turbo") || m.starts_with("gpt-4-0125") => (1000, 3000),
            m if m.starts_with("gpt-4-1106") => (1000, 3000),
            m if m.starts_with("gpt-4o") => (250, 1000),
            m if m.starts_with("gpt-4") => (3000, 6000),
            m if m.starts_with("gpt-3.5") => (50, 150),
            _ => (1000, 3000),
        };

        let prompt_cost = (prompt_tokens as u64 * prompt_price) / 1_000_000;
        let completion_cost = (completion_tokens as u64 * completion_price) / 1_000_000;

        (prompt_cost + completion_cost) as u32
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(request).await?;
        self.parse_response(response, self.model_for(request)).await
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            match self.attempt(&request).await {
                Ok(completion) => return Ok(completion),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        trace_id = %request.metadata.trace_id,
                        attempt = retry_count + 1,
                        error = %err,
                        "Retrying OpenAI completion"
                    );
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count.min(6));
            sleep(delay).await;
            retry_count += 1;
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        // GPT models use ~4 characters per token on average
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model).with_functions(true)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    functions: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCallMode>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: Option<String>,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::concierge::function_definitions;
    use crate::domain::foundation::UserId;
    use crate::ports::RequestMetadata;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            UserId::new("guest-1").unwrap(),
            "trace-1",
        ))
        .with_system_prompt("Be a hotel assistant")
        .with_messages(vec![ChatMessage::user("Any rooms?")])
    }

    /// Serves `/chat/completions` with a canned reply and records request bodies.
    async fn spawn_openai(
        status: StatusCode,
        reply: serde_json::Value,
    ) -> (String, Arc<Mutex<Vec<serde_json::Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move |Json(body): Json<serde_json::Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    recorder.lock().unwrap().push(body);
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn provider_for(base_url: &str) -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("test-key").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn timeout_secs_saturates_instead_of_wrapping() {
        let huge = OpenAIConfig::new("k").with_timeout(Duration::from_secs(u64::from(u32::MAX) + 5));
        assert_eq!(huge.timeout_secs(), u32::MAX);

        let normal = OpenAIConfig::new("k").with_timeout(Duration::from_secs(45));
        assert_eq!(normal.timeout_secs(), 45);
    }

    #[test]
    fn config_debug_hides_api_key() {
        let config = OpenAIConfig::new("sk-very-secret");
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn request_puts_system_prompt_first_and_declares_functions() {
        let provider = provider_for("https://api.openai.com/v1");
        let request = test_request()
            .with_model("gpt-3.5-turbo")
            .with_functions(function_definitions(), FunctionCallMode::Auto);

        let body = serde_json::to_value(provider.to_openai_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1], serde_json::json!({"role": "user", "content": "Any rooms?"}));
        assert_eq!(body["functions"].as_array().unwrap().len(), 3);
        assert_eq!(body["function_call"], "auto");
    }

    #[test]
    fn request_without_functions_omits_function_fields() {
        let provider = provider_for("https://api.openai.com/v1");
        let body = serde_json::to_value(provider.to_openai_request(&test_request())).unwrap();

        assert!(body.get("functions").is_none());
        assert!(body.get("function_call").is_none());
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[test]
    fn cost_calculation_gpt4() {
        // 1000 prompt tokens at 3000c/1M + 1000 completion at 6000c/1M = 3 + 6 cents
        assert_eq!(OpenAIProvider::calculate_cost("gpt-4", 1000, 1000), 9);
    }

    #[test]
    fn cost_calculation_gpt35() {
        // 100,000 tokens = 5 cents prompt, 15 cents completion
        assert_eq!(OpenAIProvider::calculate_cost("gpt-3.5-turbo", 100_000, 100_000), 20);
    }

    #[test]
    fn provider_info_reports_function_support() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("test").with_model("gpt-4")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4");
        assert!(info.supports_functions);
    }

    #[test]
    fn estimate_tokens_approximates() {
        let provider = provider_for("https://api.openai.com/v1");
        assert_eq!(provider.estimate_tokens("Hi"), 1);
        assert_eq!(provider.estimate_tokens("Hello, world!"), 3);
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 20s."}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 20);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 30);
    }

    #[tokio::test]
    async fn complete_parses_text_reply() {
        let (url, seen) = spawn_openai(
            StatusCode::OK,
            serde_json::json!({
                "model": "gpt-4-0613",
                "choices": [{
                    "message": {"role": "assistant", "content": "We have rooms."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4}
            }),
        )
        .await;

        let response = provider_for(&url)
            .complete(test_request().with_model("gpt-4"))
            .await
            .unwrap();

        assert_eq!(response.content.as_deref(), Some("We have rooms."));
        assert!(response.function_call.is_none());
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.model, "gpt-4-0613");
        assert_eq!(response.usage.total_tokens, 16);

        let bodies = seen.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["model"], "gpt-4");
    }

    #[tokio::test]
    async fn complete_parses_function_call() {
        let (url, _) = spawn_openai(
            StatusCode::OK,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "function_call": {"name": "get_rooms", "arguments": "{}"}
                    },
                    "finish_reason": "function_call"
                }]
            }),
        )
        .await;

        let response = provider_for(&url).complete(test_request()).await.unwrap();

        assert!(response.content.is_none());
        assert_eq!(response.function_call, Some(FunctionCall::new("get_rooms", "{}")));
        assert_eq!(response.finish_reason, FinishReason::FunctionCall);
        assert_eq!(response.usage, TokenUsage::zero());
    }

    #[tokio::test]
    async fn complete_maps_unauthorized() {
        let (url, _) = spawn_openai(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error": {"message": "Incorrect API key"}}),
        )
        .await;

        let err = provider_for(&url).complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn complete_maps_context_length_error() {
        let (url, _) = spawn_openai(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"error": {"code": "context_length_exceeded"}}),
        )
        .await;

        let err = provider_for(&url).complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::ContextTooLong));
    }

    #[tokio::test]
    async fn complete_does_not_retry_by_default() {
        let (url, seen) = spawn_openai(
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({"error": {"message": "overloaded"}}),
        )
        .await;

        let err = provider_for(&url).complete(test_request()).await.unwrap_err();

        assert!(matches!(err, AIError::Unavailable { .. }));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn complete_rejects_empty_choices() {
        let (url, _) = spawn_openai(StatusCode::OK, serde_json::json!({"choices": []})).await;

        let err = provider_for(&url).complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::Parse(_)));
    }
}
