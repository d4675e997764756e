//! Booking service configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Booking service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Base URL of the booking REST API (serves `/rooms` and `/book`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl BookingConfig {
    /// Validate booking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("booking.base_url"));
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://bot9assignement.deno.dev".to_string()
}
