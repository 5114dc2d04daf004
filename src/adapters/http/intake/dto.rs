//! HTTP DTOs for the intake endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::intake::QuestionPrompt;
use crate::domain::foundation::Language;
use crate::domain::intake::{AnswerKind, IntakeStage};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a new intake session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    /// Optional language tag; unrecognized tags fall back to the default.
    #[serde(default)]
    pub language: Option<String>,
}

/// Request to send one message in a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Request to end a session with a summary.
#[derive(Debug, Clone, Deserialize)]
pub struct EndRequest {
    pub session_id: String,
}

/// Request to change a session's language.
#[derive(Debug, Clone, Deserialize)]
pub struct SetLanguageRequest {
    pub session_id: String,
    pub language: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A questionnaire entry as presented to the client.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnswerKind,
    pub text: String,
}

impl From<QuestionPrompt> for QuestionDto {
    fn from(prompt: QuestionPrompt) -> Self {
        Self {
            id: prompt.id.to_string(),
            kind: prompt.kind,
            text: prompt.text,
        }
    }
}

/// Response for starting a session.
#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub session_id: String,
    pub language: Language,
    /// First question text or greeting.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// Response for one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// What to show the user: next question, transition prompt, or the
    /// generated reply with any option marker stripped.
    pub response: String,
    pub stage: IntakeStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Response for ending a session.
#[derive(Debug, Clone, Serialize)]
pub struct EndResponse {
    pub summary: String,
}

/// Response for changing a session's language.
#[derive(Debug, Clone, Serialize)]
pub struct SetLanguageResponse {
    pub status: String,
    pub language: Language,
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl ErrorResponse {
    /// Caller input failed validation; nothing changed.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            action: None,
        }
    }

    /// Unknown or expired session: the client should start over.
    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            action: Some("restart".to_string()),
        }
    }

    /// Internal or upstream failure scoped to this request.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            action: None,
        }
    }
}
