//! Conversation stages within an intake session.

use serde::{Deserialize, Serialize};

/// The coarse phase of an intake conversation.
///
/// Stages only move forward: `Questions` → `Assessment`. A session starts
/// in `Questions` (structured questionnaire) and transitions once the
/// questionnaire cursor reaches the end; free-form sessions start directly
/// in `Assessment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    /// Structured questionnaire: one fixed question per turn.
    Questions,

    /// Open-ended assessment backed by the generation service.
    Assessment,
}

impl IntakeStage {
    /// Returns a short label for the stage, suitable for API payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Assessment => "assessment",
        }
    }

    /// Returns true if transition to the target stage is valid.
    ///
    /// Transitions are forward-only; a stage never transitions to itself.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Questions, Self::Assessment)
        )
    }
}

impl Default for IntakeStage {
    fn default() -> Self {
        Self::Questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stage_is_questions() {
        assert_eq!(IntakeStage::default(), IntakeStage::Questions);
    }

    #[test]
    fn questions_may_advance_to_assessment() {
        assert!(IntakeStage::Questions.can_transition_to(&IntakeStage::Assessment));
    }

    #[test]
    fn assessment_is_terminal() {
        assert!(!IntakeStage::Assessment.can_transition_to(&IntakeStage::Questions));
        assert!(!IntakeStage::Assessment.can_transition_to(&IntakeStage::Assessment));
    }

    #[test]
    fn stages_never_move_backward() {
        assert!(!IntakeStage::Questions.can_transition_to(&IntakeStage::Questions));
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&IntakeStage::Assessment).unwrap(),
            "\"assessment\""
        );
    }
}
