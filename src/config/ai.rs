//! Generation provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generation provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a Groq key is configured
    pub fn has_groq(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate generation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_groq() {
            return Err(ValidationError::MissingRequired("GROQ_API_KEY"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidGenerationTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "llama3-70b-8192");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = AiConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("GROQ_API_KEY"))
        ));

        let config = AiConfig {
            groq_api_key: Some("gsk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = AiConfig {
            groq_api_key: Some("gsk-xxx".to_string()),
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
