//! SendMessageHandler - apply one user message to a session.
//!
//! This is the turn processor: it validates input, advances the
//! questionnaire or delegates to the generation service, and appends the
//! completed turn to session history. The per-session lock is held for the
//! whole turn, including the provider call, so concurrent turns on one
//! session serialize in arrival order.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::foundation::{DomainError, Progress, SessionId};
use crate::domain::intake::{
    extract_options, messages, AnswerKind, BooleanVocabulary, IntakeSession, IntakeStage,
    PromptCatalog, Questionnaire,
};
use crate::ports::{
    AiError, AiProvider, CompletionRequest, MessageRole, RequestMetadata, SessionStore,
    SessionStoreError,
};

use super::views::QuestionPrompt;

/// Token budget for one generated reply.
const MAX_REPLY_TOKENS: u32 = 1024;

/// Low temperature: intake answers should be steady, not creative.
const REPLY_TEMPERATURE: f32 = 0.1;

/// Command to apply one user message to a session.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub session_id: SessionId,
    pub message: String,
}

/// The system's next action after one turn.
#[derive(Debug, Clone)]
pub enum TurnReply {
    /// Ask the next questionnaire entry.
    NextQuestion {
        question: QuestionPrompt,
        progress: Progress,
    },
    /// Questionnaire finished; the assessment stage begins.
    StageTransition { prompt: String },
    /// Generated assessment reply, with any quick-reply options parsed out.
    Assessment {
        text: String,
        options: Vec<String>,
    },
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub reply: TurnReply,
    pub stage: IntakeStage,
    pub history_len: usize,
}

/// Error type for one turn. User-facing text is localized to the session
/// language by the handler, which is the last place that knows it.
#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    /// Unknown or expired session id.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// Empty message after trimming.
    #[error("message cannot be empty")]
    EmptyMessage,

    /// Boolean answer outside the accepted vocabulary. No state changed;
    /// the session stays on the same question.
    #[error("{guidance} ({expected})")]
    UnrecognizedAnswer { guidance: String, expected: String },

    /// Generation service failure. History is exactly as it was before
    /// the call.
    #[error("{user_message}")]
    Generation {
        user_message: String,
        #[source]
        source: AiError,
    },

    /// Domain invariant violation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<SessionStoreError> for SendMessageError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => SendMessageError::NotFound(id),
        }
    }
}

/// Handler applying user messages to sessions.
pub struct SendMessageHandler {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AiProvider>,
}

impl SendMessageHandler {
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn AiProvider>) -> Self {
        Self { store, provider }
    }

    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let message = cmd.message.trim();
        if message.is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        let session_ref = self.store.get(&cmd.session_id).await?;

        // Lock spans the whole turn: turns on one session are sequential.
        let mut session = session_ref.lock().await;

        let reply = match session.stage() {
            IntakeStage::Questions => self.questionnaire_turn(&mut session, message)?,
            IntakeStage::Assessment => self.assessment_turn(&mut session, message).await?,
        };

        Ok(SendMessageResult {
            stage: session.stage(),
            history_len: session.history().len(),
            reply,
        })
    }

    /// One questionnaire turn: record the answer, advance the cursor, and
    /// either ask the next question or transition to assessment.
    fn questionnaire_turn(
        &self,
        session: &mut IntakeSession,
        message: &str,
    ) -> Result<TurnReply, SendMessageError> {
        let language = session.language();
        let questionnaire = Questionnaire::standard();

        let Some(current) = questionnaire.get(session.question_index()) else {
            // Cursor already past the end; complete the transition.
            session.begin_assessment()?;
            return Ok(TurnReply::StageTransition {
                prompt: messages::stage_transition_prompt(language).to_string(),
            });
        };

        let answer: String = if current.kind == AnswerKind::Boolean {
            let vocab = BooleanVocabulary::for_language(language);
            match vocab.normalize(message) {
                Some(normalized) => normalized.to_string(),
                None => {
                    return Err(SendMessageError::UnrecognizedAnswer {
                        guidance: messages::boolean_guidance(language).to_string(),
                        expected: vocab.expected(),
                    })
                }
            }
        } else {
            message.to_string()
        };

        session.record_exchange(current.text(language), answer);
        let answered = session.advance_question();

        if answered >= questionnaire.len() {
            session.begin_assessment()?;
            return Ok(TurnReply::StageTransition {
                prompt: messages::stage_transition_prompt(language).to_string(),
            });
        }

        let next = questionnaire
            .get(answered)
            .ok_or_else(|| DomainError::validation("question_index", "cursor out of range"))?;

        Ok(TurnReply::NextQuestion {
            question: QuestionPrompt::localize(next, language),
            progress: Progress::of(answered, questionnaire.len()),
        })
    }

    /// One assessment turn: replay history to the generation service and
    /// post-process the reply. History is only appended after the call
    /// succeeds, so a failed call leaves the session untouched.
    async fn assessment_turn(
        &self,
        session: &mut IntakeSession,
        message: &str,
    ) -> Result<TurnReply, SendMessageError> {
        let language = session.language();

        let request = self.build_request(session, message);
        let response = self.provider.complete(request).await.map_err(|source| {
            tracing::warn!(session_id = %session.id(), error = %source, "generation call failed");
            SendMessageError::Generation {
                user_message: messages::internal_error(language).to_string(),
                source,
            }
        })?;

        session.record_exchange(message, response.content.clone());

        let extracted = extract_options(&response.content);
        Ok(TurnReply::Assessment {
            text: extracted.text,
            options: extracted.options,
        })
    }

    /// Rebuilds the full conversational context: system instruction, all
    /// prior pairs in order, then the current message.
    fn build_request(&self, session: &IntakeSession, message: &str) -> CompletionRequest {
        let system_prompt = PromptCatalog::standard()
            .resolve(session.language())
            .render();

        let metadata = RequestMetadata::new(session.id().clone(), Uuid::new_v4().to_string());

        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(system_prompt)
            .with_max_tokens(MAX_REPLY_TOKENS)
            .with_temperature(REPLY_TEMPERATURE);

        for exchange in session.history() {
            request = request
                .with_message(MessageRole::User, exchange.user.clone())
                .with_message(MessageRole::Assistant, exchange.assistant.clone());
        }
        request.with_message(MessageRole::User, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySessionStore, MockAiProvider, MockError};
    use crate::domain::foundation::Language;
    use crate::domain::intake::IntakeMode;

    async fn started_session(
        store: &Arc<InMemorySessionStore>,
        mode: IntakeMode,
        language: Language,
    ) -> SessionId {
        let session = IntakeSession::with_stage(language, mode.initial_stage());
        let id = session.id().clone();
        store.insert(session).await;
        id
    }

    fn handler(
        store: Arc<InMemorySessionStore>,
        provider: MockAiProvider,
    ) -> SendMessageHandler {
        SendMessageHandler::new(store, Arc::new(provider))
    }

    async fn answer_all_questions(handler: &SendMessageHandler, id: &SessionId) {
        for answer in ["Ada Lovelace", "36", "no", "yes", "headache and fever"] {
            handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: answer.to_string(),
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn questionnaire_turn_returns_next_question_with_progress() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let handler = handler(store.clone(), MockAiProvider::new());

        let result = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "Ada Lovelace".to_string(),
            })
            .await
            .unwrap();

        match result.reply {
            TurnReply::NextQuestion { question, progress } => {
                assert_eq!(question.id, "age");
                assert_eq!(progress.value(), 20);
            }
            other => panic!("expected next question, got {:?}", other),
        }
        assert_eq!(result.history_len, 1);

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.history()[0].user, "What is your full name?");
        assert_eq!(session.history()[0].assistant, "Ada Lovelace");
    }

    #[tokio::test]
    async fn boolean_answer_is_normalized_to_canonical_form() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let handler = handler(store.clone(), MockAiProvider::new());

        for msg in ["Ada", "36"] {
            handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: msg.to_string(),
                })
                .await
                .unwrap();
        }

        // "smoker" question takes "y" and records "Yes".
        handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "y".to_string(),
            })
            .await
            .unwrap();

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.history()[2].assistant, "Yes");
    }

    #[tokio::test]
    async fn unrecognized_boolean_answer_leaves_cursor_unchanged() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let handler = handler(store.clone(), MockAiProvider::new());

        for msg in ["Ada", "36"] {
            handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: msg.to_string(),
                })
                .await
                .unwrap();
        }

        let err = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "maybe".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            SendMessageError::UnrecognizedAnswer { expected, .. } => {
                assert_eq!(expected, "yes, y, no, n");
            }
            other => panic!("expected UnrecognizedAnswer, got {:?}", other),
        }

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.question_index(), 2);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn final_answer_transitions_to_assessment_without_generation_call() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let provider = MockAiProvider::new();
        let handler = SendMessageHandler::new(store.clone(), Arc::new(provider.clone()));

        answer_all_questions(&handler, &id).await;

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.stage(), IntakeStage::Assessment);
        assert_eq!(session.history().len(), 5);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn stage_transition_returns_localized_prompt() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let handler = handler(store.clone(), MockAiProvider::new());

        for msg in ["Ada", "36", "no", "yes"] {
            handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: msg.to_string(),
                })
                .await
                .unwrap();
        }

        let result = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "headache".to_string(),
            })
            .await
            .unwrap();

        match result.reply {
            TurnReply::StageTransition { prompt } => {
                assert_eq!(prompt, "Please describe your symptoms in detail:");
            }
            other => panic!("expected stage transition, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn assessment_turn_replays_history_and_appends_exchange() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::En).await;
        let provider =
            MockAiProvider::new().with_response("Rest and drink fluids. [OPTIONS: Yes, No]");
        let handler = SendMessageHandler::new(store.clone(), Arc::new(provider.clone()));

        answer_all_questions(&handler, &id).await;

        let result = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "It started two days ago".to_string(),
            })
            .await
            .unwrap();

        match result.reply {
            TurnReply::Assessment { text, options } => {
                assert_eq!(text, "Rest and drink fluids.");
                assert_eq!(options, vec!["Yes", "No"]);
            }
            other => panic!("expected assessment reply, got {:?}", other),
        }

        // The provider saw the whole questionnaire as context.
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert!(request.system_prompt.as_deref().unwrap().contains("MediPulse"));
        // 5 history pairs + current message
        assert_eq!(request.messages.len(), 11);
        assert_eq!(request.messages[0].content, "What is your full name?");
        assert_eq!(
            request.messages.last().unwrap().content,
            "It started two days ago"
        );

        // Raw reply (marker included) is what history records.
        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(
            session.history().last().unwrap().assistant,
            "Rest and drink fluids. [OPTIONS: Yes, No]"
        );
    }

    #[tokio::test]
    async fn failed_generation_leaves_history_untouched() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::FreeForm, Language::En).await;
        let handler = handler(
            store.clone(),
            MockAiProvider::new().with_error(MockError::Unavailable {
                message: "upstream down".to_string(),
            }),
        );

        let err = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "I have a headache".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            SendMessageError::Generation { user_message, .. } => {
                assert_eq!(
                    user_message,
                    "Something went wrong on our side. Please try again."
                );
            }
            other => panic!("expected Generation error, got {:?}", other),
        }

        let session = store.get(&id).await.unwrap();
        assert!(session.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn generation_error_is_localized_to_session_language() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::FreeForm, Language::Ar).await;
        let handler = handler(
            store.clone(),
            MockAiProvider::new().with_error(MockError::Timeout { timeout_secs: 30 }),
        );

        let err = handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "عندي صداع".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            SendMessageError::Generation { user_message, .. } => {
                assert!(user_message.contains("خطأ"));
            }
            other => panic!("expected Generation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_lookup() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = handler(store, MockAiProvider::new());

        let err = handler
            .handle(SendMessageCommand {
                session_id: SessionId::generate(),
                message: "   ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SendMessageError::EmptyMessage));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = handler(store, MockAiProvider::new());

        let err = handler
            .handle(SendMessageCommand {
                session_id: SessionId::generate(),
                message: "hello".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SendMessageError::NotFound(_)));
    }

    #[tokio::test]
    async fn arabic_session_uses_arabic_questionnaire_and_vocabulary() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::Structured, Language::Ar).await;
        let handler = handler(store.clone(), MockAiProvider::new());

        for msg in ["أدا لوفلايس", "36"] {
            handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: msg.to_string(),
                })
                .await
                .unwrap();
        }

        handler
            .handle(SendMessageCommand {
                session_id: id.clone(),
                message: "لا".to_string(),
            })
            .await
            .unwrap();

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.history()[0].user, "ما هو اسمك الكامل؟");
        assert_eq!(session.history()[2].assistant, "لا");
    }

    #[tokio::test]
    async fn turns_append_history_in_submission_order() {
        let store = Arc::new(InMemorySessionStore::new());
        let id = started_session(&store, IntakeMode::FreeForm, Language::En).await;
        let provider = MockAiProvider::new()
            .with_response("first reply")
            .with_response("second reply")
            .with_response("third reply");
        let handler = SendMessageHandler::new(store.clone(), Arc::new(provider));

        for (i, msg) in ["one", "two", "three"].iter().enumerate() {
            let result = handler
                .handle(SendMessageCommand {
                    session_id: id.clone(),
                    message: msg.to_string(),
                })
                .await
                .unwrap();
            assert_eq!(result.history_len, i + 1);
        }

        let session = store.get(&id).await.unwrap();
        let session = session.lock().await;
        let pairs: Vec<(&str, &str)> = session
            .history()
            .iter()
            .map(|e| (e.user.as_str(), e.assistant.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("one", "first reply"),
                ("two", "second reply"),
                ("three", "third reply"),
            ]
        );
    }
}
