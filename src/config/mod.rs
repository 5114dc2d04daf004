//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `MEDIPULSE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use medipulse::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod intake;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use intake::IntakeConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation provider configuration (Groq)
    #[serde(default)]
    pub ai: AiConfig,

    /// Intake behavior (mode, session TTL)
    #[serde(default)]
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `MEDIPULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MEDIPULSE__SERVER__PORT=4000` -> `server.port = 4000`
    /// - `MEDIPULSE__AI__GROQ_API_KEY=...` -> `ai.groq_api_key = ...`
    /// - `MEDIPULSE__INTAKE__MODE=free_form` -> `intake.mode = free_form`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required values are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEDIPULSE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.intake.validate()?;
        Ok(())
    }
}
