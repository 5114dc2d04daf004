//! Session Store Port - keyed access to live intake sessions.
//!
//! The store hands out per-session handles (`Arc<Mutex<IntakeSession>>`).
//! The mutex is the single-writer discipline for one session: a turn locks
//! it across its whole read-modify-append sequence, so concurrent turns on
//! the same session id serialize in arrival order while distinct sessions
//! proceed independently.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::SessionId;
use crate::domain::intake::IntakeSession;

/// Shared, individually-locked handle to one live session.
pub type SessionRef = Arc<Mutex<IntakeSession>>;

/// Session store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionStoreError {
    /// No live session under this id. An expected outcome (stale or
    /// unknown client token), not a fault.
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// Port for the process-lifetime session map.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a freshly created session and returns its handle.
    async fn insert(&self, session: IntakeSession) -> SessionRef;

    /// Looks up a session handle by id.
    async fn get(&self, id: &SessionId) -> Result<SessionRef, SessionStoreError>;

    /// Removes a session from the store.
    async fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Number of live sessions.
    async fn count(&self) -> usize;
}
