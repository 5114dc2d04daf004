//! SetLanguageHandler - switch a session's conversation language.

use std::sync::Arc;

use crate::domain::foundation::{Language, SessionId, ValidationError};
use crate::ports::{SessionStore, SessionStoreError};

/// Command to change a session's language.
#[derive(Debug, Clone)]
pub struct SetLanguageCommand {
    pub session_id: SessionId,
    /// Requested tag; parsed strictly, unlike session start.
    pub language: String,
}

/// Result of changing a session's language.
#[derive(Debug, Clone)]
pub struct SetLanguageResult {
    pub language: Language,
}

/// Error type for changing language.
#[derive(Debug, thiserror::Error)]
pub enum SetLanguageError {
    /// Unknown or expired session id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// Tag outside the supported set. The stored language is unchanged.
    #[error(transparent)]
    Unsupported(#[from] ValidationError),
}

impl From<SessionStoreError> for SetLanguageError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => SetLanguageError::NotFound(id),
        }
    }
}

/// Handler for language changes.
pub struct SetLanguageHandler {
    store: Arc<dyn SessionStore>,
}

impl SetLanguageHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SetLanguageCommand,
    ) -> Result<SetLanguageResult, SetLanguageError> {
        let session_ref = self.store.get(&cmd.session_id).await?;
        let language: Language = cmd.language.parse()?;

        let mut session = session_ref.lock().await;
        session.set_language(language);
        tracing::debug!(session_id = %session.id(), %language, "session language changed");

        Ok(SetLanguageResult { language })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::intake::IntakeSession;

    async fn stored_session(store: &Arc<InMemorySessionStore>) -> SessionId {
        let session = IntakeSession::new(Language::En);
        let id = session.id().clone();
        store.insert(session).await;
        id
    }

    #[tokio::test]
    async fn sets_a_supported_language() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = stored_session(&store).await;
        let handler = SetLanguageHandler::new(store.clone());

        let result = handler
            .handle(SetLanguageCommand {
                session_id: id.clone(),
                language: "ar".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.language, Language::Ar);
        let session = store.get(&id).await.unwrap();
        assert_eq!(session.lock().await.language(), Language::Ar);
    }

    #[tokio::test]
    async fn unsupported_tag_errors_and_leaves_language_unchanged() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = stored_session(&store).await;
        let handler = SetLanguageHandler::new(store.clone());

        let err = handler
            .handle(SetLanguageCommand {
                session_id: id.clone(),
                language: "fr".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SetLanguageError::Unsupported(_)));
        let session = store.get(&id).await.unwrap();
        assert_eq!(session.lock().await.language(), Language::En);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = SetLanguageHandler::new(store);

        let err = handler
            .handle(SetLanguageCommand {
                session_id: SessionId::generate(),
                language: "ar".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SetLanguageError::NotFound(_)));
    }
}
