//! Read views shared by intake handlers.

use crate::domain::foundation::Language;
use crate::domain::intake::{AnswerKind, Question};

/// A question as presented to the caller: localized text plus the declared
/// input kind so the client can render the right control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPrompt {
    pub id: &'static str,
    pub kind: AnswerKind,
    pub text: String,
}

impl QuestionPrompt {
    /// Localizes a questionnaire entry for presentation.
    pub fn localize(question: &Question, language: Language) -> Self {
        Self {
            id: question.id,
            kind: question.kind,
            text: question.text(language).to_string(),
        }
    }
}
