//! Intake conversation modes.

use serde::{Deserialize, Serialize};

use super::IntakeStage;

/// How a conversation begins.
///
/// One turn processor serves both modes; the mode only decides the stage a
/// new session starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeMode {
    /// Fixed questionnaire first, then assessment.
    #[default]
    Structured,
    /// Assessment from the first turn; no questionnaire.
    FreeForm,
}

impl IntakeMode {
    /// The stage a new session starts in under this mode.
    pub fn initial_stage(&self) -> IntakeStage {
        match self {
            IntakeMode::Structured => IntakeStage::Questions,
            IntakeMode::FreeForm => IntakeStage::Assessment,
        }
    }
}
