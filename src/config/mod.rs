//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONCIERGE` prefix and nested values use double underscores as separators.
//! The conventional `OPENAI_API_KEY` and `PORT` variables are accepted as
//! fallbacks for the API key and listening port.
//!
//! # Example
//!
//! ```no_run
//! use hotel_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.port);
//! ```

mod ai;
mod booking;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use booking::BookingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (SQLite connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Booking service configuration
    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds `ai.openai_api_key` / `server.port` from `OPENAI_API_KEY` / `PORT`
    /// 3. Reads environment variables with `CONCIERGE` prefix, which win over step 2
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CONCIERGE__AI__SYNTHESIS_MODEL=gpt-4o` -> `ai.synthesis_model = gpt-4o`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            builder = builder.set_default("ai.openai_api_key", key)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_default("server.port", port)?;
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.booking.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
