//! The fixed intake questionnaire.
//!
//! Question order is load-bearing: answers are recorded into history as
//! (question text, answer) pairs in the order asked, and the cursor index
//! into this list is part of session state.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::domain::foundation::Language;

/// What kind of answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Text,
    Number,
    Boolean,
}

/// One questionnaire entry with localized text.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub kind: AnswerKind,
    text_en: &'static str,
    text_ar: &'static str,
}

impl Question {
    /// Returns the question text in the given language.
    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.text_en,
            Language::Ar => self.text_ar,
        }
    }
}

/// Accepted yes/no inputs for one language, with the canonical forms
/// recorded into history.
#[derive(Debug, Clone)]
pub struct BooleanVocabulary {
    yes: &'static [&'static str],
    no: &'static [&'static str],
    canonical_yes: &'static str,
    canonical_no: &'static str,
}

impl BooleanVocabulary {
    /// Returns the vocabulary for the given language.
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::En => &EN_BOOLEAN,
            Language::Ar => &AR_BOOLEAN,
        }
    }

    /// Normalizes raw input to the canonical yes/no form.
    ///
    /// Matching trims and lowercases the input. Returns `None` for input
    /// outside the accepted vocabulary.
    pub fn normalize(&self, input: &str) -> Option<&'static str> {
        let needle = input.trim().to_lowercase();
        if self.yes.iter().any(|v| *v == needle) {
            Some(self.canonical_yes)
        } else if self.no.iter().any(|v| *v == needle) {
            Some(self.canonical_no)
        } else {
            None
        }
    }

    /// Lists the accepted inputs, for validation error messages.
    pub fn expected(&self) -> String {
        self.yes
            .iter()
            .chain(self.no.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

static EN_BOOLEAN: BooleanVocabulary = BooleanVocabulary {
    yes: &["yes", "y"],
    no: &["no", "n"],
    canonical_yes: "Yes",
    canonical_no: "No",
};

static AR_BOOLEAN: BooleanVocabulary = BooleanVocabulary {
    yes: &["نعم", "اي", "أجل"],
    no: &["لا", "كلا"],
    canonical_yes: "نعم",
    canonical_no: "لا",
};

/// The ordered intake questionnaire.
#[derive(Debug)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

static STANDARD: Lazy<Questionnaire> = Lazy::new(|| Questionnaire {
    questions: vec![
        Question {
            id: "name",
            kind: AnswerKind::Text,
            text_en: "What is your full name?",
            text_ar: "ما هو اسمك الكامل؟",
        },
        Question {
            id: "age",
            kind: AnswerKind::Number,
            text_en: "What is your age?",
            text_ar: "كم عمرك؟",
        },
        Question {
            id: "smoker",
            kind: AnswerKind::Boolean,
            text_en: "Are you currently a smoker?",
            text_ar: "هل أنت مدخن حاليًا؟",
        },
        Question {
            id: "conditions",
            kind: AnswerKind::Boolean,
            text_en: "Do you have any existing medical conditions?",
            text_ar: "هل لديك أي حالات طبية قائمة؟",
        },
        Question {
            id: "symptoms",
            kind: AnswerKind::Text,
            text_en: "What specific symptoms are you experiencing?",
            text_ar: "ما هي الأعراض التي تعاني منها تحديدًا؟",
        },
    ],
});

impl Questionnaire {
    /// The standard health-intake questionnaire.
    pub fn standard() -> &'static Questionnaire {
        &STANDARD
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True when the questionnaire has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the question at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
