//! AI Provider Port - Interface for LLM provider integrations.
//!
//! This port abstracts chat completions with function calling, so the
//! concierge can plan, dispatch and reply without coupling to a vendor API.
//!
//! # Design
//!
//! - Non-streaming completions only
//! - Provider-agnostic message format ([`ChatMessage`])
//! - Model is chosen per request (the planning and synthesis calls differ)
//! - Function declarations are optional; with none, the model can only answer in text
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::text("Hello!", "echo"))
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::concierge::{ChatMessage, FunctionCall, FunctionDefinition};
use crate::domain::foundation::UserId;

/// Port for AI/LLM provider interactions.
///
/// Implementations connect to an external chat-completions service and
/// translate between the provider-specific API and our domain types.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Estimate token count for text (for logging before an API call).
    fn estimate_tokens(&self, text: &str) -> u32;

    /// Get provider information (name, default model, capabilities).
    fn provider_info(&self) -> ProviderInfo;
}

/// How the model may use the declared functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCallMode {
    /// The model decides whether to call a function.
    Auto,
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation messages (history + current user message).
    pub messages: Vec<ChatMessage>,
    /// System prompt, sent ahead of `messages`.
    pub system_prompt: Option<String>,
    /// Model override; the provider's default model is used when unset.
    pub model: Option<String>,
    /// Functions the model may call.
    pub functions: Vec<FunctionDefinition>,
    /// Function-call mode; only sent when functions are declared.
    pub function_call: Option<FunctionCallMode>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            model: None,
            functions: Vec::new(),
            function_call: None,
            metadata,
        }
    }

    /// Replaces the conversation messages.
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Declares callable functions with the given call mode.
    pub fn with_functions(mut self, functions: &[FunctionDefinition], mode: FunctionCallMode) -> Self {
        self.functions = functions.to_vec();
        self.function_call = Some(mode);
        self
    }

    /// Returns the full message list the model sees: system prompt first.
    pub fn prompt_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        if let Some(ref prompt) = self.system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }
        messages.extend(self.messages.iter().cloned());
        messages
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Guest making the request.
    pub user_id: UserId,
    /// Trace ID for correlating the calls of one chat turn.
    pub trace_id: String,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(user_id: UserId, trace_id: impl Into<String>) -> Self {
        Self {
            user_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, if any.
    pub content: Option<String>,
    /// Function the model asked to run, if any.
    pub function_call: Option<FunctionCall>,
    /// Token usage and cost.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    /// Creates a plain-text response.
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            function_call: None,
            usage: TokenUsage::default(),
            model: model.into(),
            finish_reason: FinishReason::Stop,
        }
    }

    /// Creates a function-call response.
    pub fn function_call(call: FunctionCall, model: impl Into<String>) -> Self {
        Self {
            content: None,
            function_call: Some(call),
            usage: TokenUsage::default(),
            model: model.into(),
            finish_reason: FinishReason::FunctionCall,
        }
    }

    /// Sets token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
    /// Estimated cost in cents.
    pub estimated_cost_cents: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, cost_cents: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            estimated_cost_cents: cost_cents,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sums two usages (e.g. planning + synthesis calls).
    pub fn combined(&self, other: &TokenUsage) -> TokenUsage {
        TokenUsage::new(
            self.prompt_tokens + other.prompt_tokens,
            self.completion_tokens + other.completion_tokens,
            self.estimated_cost_cents + other.estimated_cost_cents,
        )
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Model requested a function call.
    FunctionCall,
    /// Content was filtered for safety.
    ContentFilter,
}

/// Provider information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Default model identifier.
    pub model: String,
    /// Whether function calling is supported.
    pub supports_functions: bool,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            supports_functions: false,
        }
    }

    /// Sets function calling support.
    pub fn with_functions(mut self, supports: bool) -> Self {
        self.supports_functions = supports;
        self
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Context (prompt + history) exceeds model limit.
    #[error("context too long for model")]
    ContextTooLong,

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
