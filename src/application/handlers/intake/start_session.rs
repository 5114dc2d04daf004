//! StartSessionHandler - create a session and produce its opening prompt.

use std::sync::Arc;

use crate::domain::foundation::{Language, Progress, SessionId};
use crate::domain::intake::{messages, IntakeMode, IntakeSession, Questionnaire};
use crate::ports::SessionStore;

use super::views::QuestionPrompt;

/// Command to start a new intake session.
#[derive(Debug, Clone, Default)]
pub struct StartSessionCommand {
    /// Requested language tag; unrecognized or absent tags resolve to the
    /// default language.
    pub language: Option<String>,
}

/// What a new session opens with.
#[derive(Debug, Clone)]
pub enum StartPrompt {
    /// Structured mode: the first questionnaire entry.
    Question {
        question: QuestionPrompt,
        progress: Progress,
    },
    /// Free-form mode: a plain greeting.
    Greeting { text: String },
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session_id: SessionId,
    pub language: Language,
    pub prompt: StartPrompt,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    store: Arc<dyn SessionStore>,
    mode: IntakeMode,
}

impl StartSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, mode: IntakeMode) -> Self {
        Self { store, mode }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> StartSessionResult {
        let language = Language::resolve(cmd.language.as_deref());
        let session = IntakeSession::with_stage(language, self.mode.initial_stage());
        let session_id = session.id().clone();

        self.store.insert(session).await;
        tracing::debug!(session_id = %session_id, %language, mode = ?self.mode, "session started");

        let prompt = match self.mode {
            IntakeMode::Structured => {
                let questionnaire = Questionnaire::standard();
                match questionnaire.get(0) {
                    Some(question) => StartPrompt::Question {
                        question: QuestionPrompt::localize(question, language),
                        progress: Progress::of(0, questionnaire.len()),
                    },
                    // Empty questionnaire degenerates to free-form.
                    None => StartPrompt::Greeting {
                        text: messages::greeting(language).to_string(),
                    },
                }
            }
            IntakeMode::FreeForm => StartPrompt::Greeting {
                text: messages::greeting(language).to_string(),
            },
        };

        StartSessionResult {
            session_id,
            language,
            prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::intake::IntakeStage;

    fn handler(mode: IntakeMode) -> (StartSessionHandler, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        (StartSessionHandler::new(store.clone(), mode), store)
    }

    #[tokio::test]
    async fn structured_start_returns_first_question() {
        let (handler, store) = handler(IntakeMode::Structured);

        let result = handler.handle(StartSessionCommand::default()).await;

        assert_eq!(result.language, Language::En);
        match result.prompt {
            StartPrompt::Question { question, progress } => {
                assert_eq!(question.id, "name");
                assert_eq!(question.text, "What is your full name?");
                assert_eq!(progress, Progress::ZERO);
            }
            other => panic!("expected first question, got {:?}", other),
        }
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn free_form_start_returns_greeting_in_assessment_stage() {
        let (handler, store) = handler(IntakeMode::FreeForm);

        let result = handler.handle(StartSessionCommand::default()).await;

        assert!(matches!(result.prompt, StartPrompt::Greeting { .. }));
        let session = store.get(&result.session_id).await.unwrap();
        assert_eq!(session.lock().await.stage(), IntakeStage::Assessment);
    }

    #[tokio::test]
    async fn start_honors_requested_language() {
        let (handler, _) = handler(IntakeMode::Structured);

        let result = handler
            .handle(StartSessionCommand {
                language: Some("ar".to_string()),
            })
            .await;

        assert_eq!(result.language, Language::Ar);
        match result.prompt {
            StartPrompt::Question { question, .. } => {
                assert_eq!(question.text, "ما هو اسمك الكامل؟");
            }
            other => panic!("expected question, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_language_tag_falls_back_to_default() {
        let (handler, _) = handler(IntakeMode::Structured);

        let result = handler
            .handle(StartSessionCommand {
                language: Some("fr".to_string()),
            })
            .await;

        assert_eq!(result.language, Language::En);
    }

    #[tokio::test]
    async fn each_start_returns_a_fresh_session_id() {
        let (handler, store) = handler(IntakeMode::Structured);

        let a = handler.handle(StartSessionCommand::default()).await;
        let b = handler.handle(StartSessionCommand::default()).await;

        assert_ne!(a.session_id, b.session_id);
        assert_eq!(store.count().await, 2);
    }
}
