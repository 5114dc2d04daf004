//! HTTP adapters - REST API implementations.

pub mod intake;

// Re-export key types for convenience
pub use intake::intake_router;
pub use intake::IntakeAppState;
