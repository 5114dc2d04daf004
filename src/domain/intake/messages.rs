//! Localized user-facing strings.
//!
//! Fixed copy returned by the backend itself (as opposed to generated
//! text): greetings, the stage-transition prompt, validation guidance,
//! and the generic internal-error message.

use crate::domain::foundation::Language;

/// Greeting for a free-form session's first response.
pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Hello! I'm MediPulse, your health information assistant. \
             How can I help you today?"
        }
        Language::Ar => "مرحبًا! أنا ميدي بالس، مساعدك للمعلومات الصحية. كيف يمكنني مساعدتك اليوم؟",
    }
}

/// Prompt returned when the questionnaire completes and the assessment
/// stage begins.
pub fn stage_transition_prompt(language: Language) -> &'static str {
    match language {
        Language::En => "Please describe your symptoms in detail:",
        Language::Ar => "يرجى وصف الأعراض التي تعاني منها بالتفصيل:",
    }
}

/// Guidance shown when a yes/no answer was not recognized.
pub fn boolean_guidance(language: Language) -> &'static str {
    match language {
        Language::En => "Please answer Yes or No",
        Language::Ar => "يرجى الإجابة بنعم أو لا",
    }
}

/// Generic internal-error message, localized to the session language.
pub fn internal_error(language: Language) -> &'static str {
    match language {
        Language::En => "Something went wrong on our side. Please try again.",
        Language::Ar => "حدث خطأ من جهتنا. يرجى المحاولة مرة أخرى.",
    }
}

/// Message for an unknown or expired session.
pub fn invalid_session(language: Language) -> &'static str {
    match language {
        Language::En => "This session is invalid or has expired. Please start over.",
        Language::Ar => "هذه الجلسة غير صالحة أو منتهية. يرجى البدء من جديد.",
    }
}
