//! Command and query handlers.

pub mod intake;
