//! Intake operation handlers.

mod end_session;
mod send_message;
mod set_language;
mod start_session;
mod views;

pub use end_session::{EndSessionCommand, EndSessionError, EndSessionHandler, EndSessionResult};
pub use send_message::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult, TurnReply,
};
pub use set_language::{
    SetLanguageCommand, SetLanguageError, SetLanguageHandler, SetLanguageResult,
};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult, StartPrompt};
pub use views::QuestionPrompt;
