//! HTTP handlers for the intake endpoints.
//!
//! These handlers connect axum routes to the application layer handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::intake::{
    EndSessionCommand, EndSessionError, EndSessionHandler, SendMessageCommand, SendMessageError,
    SendMessageHandler, SetLanguageCommand, SetLanguageError, SetLanguageHandler, StartPrompt,
    StartSessionCommand, StartSessionHandler, TurnReply,
};
use crate::domain::foundation::SessionId;
use crate::domain::intake::IntakeMode;
use crate::ports::{AiProvider, SessionStore};

use super::dto::{
    ChatRequest, ChatResponse, EndRequest, EndResponse, ErrorResponse, QuestionDto,
    SetLanguageRequest, SetLanguageResponse, StartRequest, StartResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Application state
// ════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all intake dependencies.
#[derive(Clone)]
pub struct IntakeAppState {
    pub store: Arc<dyn SessionStore>,
    pub provider: Arc<dyn AiProvider>,
    pub mode: IntakeMode,
}

impl IntakeAppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn AiProvider>,
        mode: IntakeMode,
    ) -> Self {
        Self {
            store,
            provider,
            mode,
        }
    }

    pub fn start_session_handler(&self) -> StartSessionHandler {
        StartSessionHandler::new(self.store.clone(), self.mode)
    }

    pub fn send_message_handler(&self) -> SendMessageHandler {
        SendMessageHandler::new(self.store.clone(), self.provider.clone())
    }

    pub fn end_session_handler(&self) -> EndSessionHandler {
        EndSessionHandler::new(self.store.clone(), self.provider.clone())
    }

    pub fn set_language_handler(&self) -> SetLanguageHandler {
        SetLanguageHandler::new(self.store.clone())
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// Parses a session token; failures look like an unknown session to the
/// caller, since a token we can't parse cannot belong to a live session.
fn parse_session_id(raw: &str) -> Result<SessionId, ErrorReply> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::invalid_session("Invalid session")),
        )
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════

/// Start a new intake session.
///
/// POST /api/intake/start
pub async fn start_session(
    State(app_state): State<IntakeAppState>,
    Json(req): Json<StartRequest>,
) -> impl IntoResponse {
    let handler = app_state.start_session_handler();
    let result = handler
        .handle(StartSessionCommand {
            language: req.language,
        })
        .await;

    let response = match result.prompt {
        StartPrompt::Question { question, progress } => StartResponse {
            session_id: result.session_id.to_string(),
            language: result.language,
            message: question.text.clone(),
            question: Some(QuestionDto::from(question)),
            progress: Some(progress.value()),
        },
        StartPrompt::Greeting { text } => StartResponse {
            session_id: result.session_id.to_string(),
            language: result.language,
            message: text,
            question: None,
            progress: None,
        },
    };

    (StatusCode::CREATED, Json(response))
}

/// Apply one user message to a session.
///
/// POST /api/intake/chat
pub async fn chat(
    State(app_state): State<IntakeAppState>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, ErrorReply> {
    let session_id = parse_session_id(&req.session_id)?;

    let handler = app_state.send_message_handler();
    let result = handler
        .handle(SendMessageCommand {
            session_id,
            message: req.message,
        })
        .await
        .map_err(map_send_message_error)?;

    let stage = result.stage;
    let response = match result.reply {
        TurnReply::NextQuestion { question, progress } => ChatResponse {
            response: question.text.clone(),
            stage,
            question: Some(QuestionDto::from(question)),
            progress: Some(progress.value()),
            options: None,
        },
        TurnReply::StageTransition { prompt } => ChatResponse {
            response: prompt,
            stage,
            question: None,
            progress: None,
            options: None,
        },
        TurnReply::Assessment { text, options } => ChatResponse {
            response: text,
            stage,
            question: None,
            progress: None,
            options: (!options.is_empty()).then_some(options),
        },
    };

    Ok((StatusCode::OK, Json(response)))
}

/// End a session with a summary of the conversation.
///
/// POST /api/intake/end
pub async fn end_session(
    State(app_state): State<IntakeAppState>,
    Json(req): Json<EndRequest>,
) -> Result<impl IntoResponse, ErrorReply> {
    let session_id = parse_session_id(&req.session_id)?;

    let handler = app_state.end_session_handler();
    let result = handler
        .handle(EndSessionCommand { session_id })
        .await
        .map_err(|e| match e {
            EndSessionError::NotFound(_) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::invalid_session("Invalid session")),
            ),
            EndSessionError::Generation { user_message, .. } => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::internal(user_message)),
            ),
        })?;

    Ok((
        StatusCode::OK,
        Json(EndResponse {
            summary: result.summary,
        }),
    ))
}

/// Change a session's language.
///
/// POST /api/intake/language
pub async fn set_language(
    State(app_state): State<IntakeAppState>,
    Json(req): Json<SetLanguageRequest>,
) -> Result<impl IntoResponse, ErrorReply> {
    let session_id = parse_session_id(&req.session_id)?;

    let handler = app_state.set_language_handler();
    let result = handler
        .handle(SetLanguageCommand {
            session_id,
            language: req.language,
        })
        .await
        .map_err(|e| match e {
            SetLanguageError::NotFound(_) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::invalid_session("Invalid session")),
            ),
            SetLanguageError::Unsupported(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(err.to_string())),
            ),
        })?;

    Ok((
        StatusCode::OK,
        Json(SetLanguageResponse {
            status: "ok".to_string(),
            language: result.language,
        }),
    ))
}

fn map_send_message_error(err: SendMessageError) -> ErrorReply {
    match err {
        SendMessageError::NotFound(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::invalid_session("Invalid session")),
        ),
        SendMessageError::EmptyMessage => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation("Message cannot be empty")),
        ),
        SendMessageError::UnrecognizedAnswer { guidance, expected } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(format!("{} ({})", guidance, expected))),
        ),
        SendMessageError::Generation { user_message, .. } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::internal(user_message)),
        ),
        SendMessageError::Domain(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(err.to_string())),
        ),
    }
}
