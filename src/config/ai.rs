//! AI provider configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Chat completions base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model for the first call, which may request a function
    #[serde(default = "default_planning_model")]
    pub planning_model: String,

    /// Model for the reply written after a function result is available
    #[serde(default = "default_synthesis_model")]
    pub synthesis_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default)]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("ai.base_url"));
        }
        if self.planning_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("ai.planning_model"));
        }
        if self.synthesis_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("ai.synthesis_model"));
        }
        Ok(())
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("planning_model", &self.planning_model)
            .field("synthesis_model", &self.synthesis_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            planning_model: default_planning_model(),
            synthesis_model: default_synthesis_model(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_planning_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_synthesis_model() -> String {
    "gpt-4".to_string()
}

fn default_timeout() -> u64 {
    120
}
