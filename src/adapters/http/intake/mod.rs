//! HTTP adapter for the intake API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::IntakeAppState;
pub use routes::intake_router;
