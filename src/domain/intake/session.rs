//! The intake session aggregate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Language, SessionId};

use super::IntakeStage;

/// One completed turn: what the user said and what the system answered.
///
/// During the questionnaire stage the "user" side holds the question text
/// and the "assistant" side the normalized answer, mirroring how the
/// transcript is replayed to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Server-side record of one user's ongoing intake conversation.
///
/// Invariants:
/// - the id is assigned at construction and never changes;
/// - history is append-only and ordered;
/// - the question cursor only moves forward;
/// - the stage only moves forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSession {
    id: SessionId,
    language: Language,
    history: Vec<Exchange>,
    stage: IntakeStage,
    question_index: usize,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl IntakeSession {
    /// Creates a new session starting at the first question.
    pub fn new(language: Language) -> Self {
        Self::with_stage(language, IntakeStage::Questions)
    }

    /// Creates a new session starting in the given stage.
    ///
    /// Free-form conversations skip the questionnaire and start directly
    /// in `Assessment`.
    pub fn with_stage(language: Language, stage: IntakeStage) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::generate(),
            language,
            history: Vec::new(),
            stage,
            question_index: 0,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Changes the session language. Takes effect from the next turn.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.touch();
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    /// Appends one completed turn to history.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(Exchange::new(user, assistant));
        self.touch();
    }

    /// Moves the question cursor forward by one and returns the new index.
    pub fn advance_question(&mut self) -> usize {
        self.question_index += 1;
        self.touch();
        self.question_index
    }

    /// Transitions the session into the assessment stage.
    ///
    /// Fails if the session is already past the questionnaire; stages never
    /// move backward.
    pub fn begin_assessment(&mut self) -> Result<(), DomainError> {
        if !self.stage.can_transition_to(&IntakeStage::Assessment) {
            return Err(DomainError::new(
                ErrorCode::InvalidStageTransition,
                format!("cannot transition from {} to assessment", self.stage.label()),
            ));
        }
        self.stage = IntakeStage::Assessment;
        self.touch();
        Ok(())
    }

    /// Refreshes the activity timestamp.
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// True if the session's age exceeds the given lifetime.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}
