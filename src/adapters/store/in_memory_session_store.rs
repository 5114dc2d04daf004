//! In-Memory Session Store Adapter
//!
//! Process-lifetime session map. The outer `RwLock` guards the map shape
//! only; each session carries its own `Mutex` so turns on one session
//! serialize without blocking other sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::SessionId;
use crate::domain::intake::IntakeSession;
use crate::ports::{SessionRef, SessionStore, SessionStoreError};

/// In-memory store with optional created-at TTL.
///
/// The TTL is checked on access: an expired session is evicted and reported
/// as not found. With no TTL configured, sessions live until process exit.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionRef>>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Creates a store without session expiry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: None,
        }
    }

    /// Creates a store that evicts sessions older than `ttl` on access.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Some(ttl),
        }
    }

    /// Clears all stored sessions (useful for tests).
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// True if `session` has outlived the configured TTL.
    async fn expired(&self, session_ref: &SessionRef) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        session_ref.lock().await.is_expired(ttl, Utc::now())
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: IntakeSession) -> SessionRef {
        let id = session.id().clone();
        let session_ref: SessionRef = Arc::new(Mutex::new(session));
        self.sessions
            .write()
            .await
            .insert(id, session_ref.clone());
        session_ref
    }

    async fn get(&self, id: &SessionId) -> Result<SessionRef, SessionStoreError> {
        let session_ref = {
            let sessions = self.sessions.read().await;
            sessions.get(id).cloned()
        };

        let Some(session_ref) = session_ref else {
            tracing::debug!(session_id = %id, "session lookup missed");
            return Err(SessionStoreError::NotFound(id.clone()));
        };

        if self.expired(&session_ref).await {
            tracing::debug!(session_id = %id, "session expired; evicting");
            self.sessions.write().await.remove(id);
            return Err(SessionStoreError::NotFound(id.clone()));
        }

        Ok(session_ref)
    }

    async fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionStoreError::NotFound(id.clone()))
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
