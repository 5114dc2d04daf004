//! EndSessionHandler - summarize a conversation.
//!
//! Ending a conversation is a read: the full history goes to the
//! generation service under a fixed summarization instruction. The session
//! itself stays in the store and the summary is not recorded into history.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::foundation::SessionId;
use crate::domain::intake::{messages, PromptCatalog};
use crate::ports::{
    AiError, AiProvider, CompletionRequest, MessageRole, RequestMetadata, SessionStore,
    SessionStoreError,
};

/// Token budget for the summary.
const MAX_SUMMARY_TOKENS: u32 = 512;

/// Command to end a session with a summary.
#[derive(Debug, Clone)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
}

/// Result of ending a session.
#[derive(Debug, Clone)]
pub struct EndSessionResult {
    pub summary: String,
}

/// Error type for ending a session.
#[derive(Debug, thiserror::Error)]
pub enum EndSessionError {
    /// Unknown or expired session id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// Generation service failure, localized to the session language.
    #[error("{user_message}")]
    Generation {
        user_message: String,
        #[source]
        source: AiError,
    },
}

impl From<SessionStoreError> for EndSessionError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => EndSessionError::NotFound(id),
        }
    }
}

/// Handler for ending sessions.
pub struct EndSessionHandler {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AiProvider>,
}

impl EndSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn AiProvider>) -> Self {
        Self { store, provider }
    }

    pub async fn handle(&self, cmd: EndSessionCommand) -> Result<EndSessionResult, EndSessionError> {
        let session_ref = self.store.get(&cmd.session_id).await?;
        let mut session = session_ref.lock().await;
        let language = session.language();

        let metadata = RequestMetadata::new(session.id().clone(), Uuid::new_v4().to_string());
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(PromptCatalog::summary_instruction(language))
            .with_max_tokens(MAX_SUMMARY_TOKENS);

        for exchange in session.history() {
            request = request
                .with_message(MessageRole::User, exchange.user.clone())
                .with_message(MessageRole::Assistant, exchange.assistant.clone());
        }

        let response = self.provider.complete(request).await.map_err(|source| {
            tracing::warn!(session_id = %session.id(), error = %source, "summary call failed");
            EndSessionError::Generation {
                user_message: messages::internal_error(language).to_string(),
                source,
            }
        })?;

        session.touch();

        Ok(EndSessionResult {
            summary: response.content,
        })
    }
}
