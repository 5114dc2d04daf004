//! Intake behavior configuration

use serde::Deserialize;

use crate::domain::intake::IntakeMode;

use super::error::ValidationError;

/// Intake behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeConfig {
    /// Conversation mode: structured questionnaire first, or free-form
    /// assessment from the first turn.
    #[serde(default)]
    pub mode: IntakeMode,

    /// Optional session lifetime in seconds. Unset means sessions live
    /// until process exit.
    pub session_ttl_secs: Option<i64>,
}

impl IntakeConfig {
    /// Session TTL as a chrono Duration, when configured.
    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        self.session_ttl_secs.map(chrono::Duration::seconds)
    }

    /// Validate intake configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ttl) = self.session_ttl_secs {
            if ttl <= 0 {
                return Err(ValidationError::InvalidSessionTtl);
            }
        }
        Ok(())
    }
}
