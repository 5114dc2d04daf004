//! HTTP routes for the intake endpoints.

use axum::{routing::post, Router};

use super::handlers::{chat, end_session, set_language, start_session, IntakeAppState};

/// Creates the intake router with all endpoints.
pub fn intake_router(state: IntakeAppState) -> Router {
    Router::new()
        .route("/start", post(start_session))
        .route("/chat", post(chat))
        .route("/end", post(end_session))
        .route("/language", post(set_language))
        .with_state(state)
}
