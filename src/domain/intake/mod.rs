//! Intake conversation model.
//!
//! A session moves through a fixed questionnaire, then an open-ended
//! assessment stage backed by the generation service.

pub mod messages;
mod mode;
mod options;
mod prompts;
mod question;
mod session;
mod stage;

pub use mode::IntakeMode;
pub use options::{extract_options, ExtractedReply};
pub use prompts::{PromptCatalog, PromptTemplate};
pub use question::{AnswerKind, BooleanVocabulary, Question, Questionnaire};
pub use session::{Exchange, IntakeSession};
pub use stage::IntakeStage;
