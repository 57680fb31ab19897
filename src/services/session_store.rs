use async_trait::async_trait;
use chrono::Utc;
use ribbon_core::LensForm;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::models::{Session, SessionId};

/// Shared handle to one session. Writers hold the lock for a whole event.
pub type SessionHandle = Arc<RwLock<Session>>;

/// Trait for session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session around `form` and return its handle
    async fn create(&self, form: LensForm) -> Result<SessionHandle, ApiError>;

    /// Find a session by ID
    async fn find(&self, id: &SessionId) -> Result<Option<SessionHandle>, ApiError>;

    /// Drop a session; `false` if it did not exist
    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError>;

    /// Drop sessions idle for longer than `ttl`; returns how many went away
    async fn evict_idle(&self, ttl: chrono::Duration) -> Result<usize, ApiError>;

    async fn len(&self) -> usize;
}

/// In-memory session storage
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, form: LensForm) -> Result<SessionHandle, ApiError> {
        let mut sessions = self.sessions.write().await;
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        let handle = Arc::new(RwLock::new(Session::new(id.clone(), form)));
        sessions.insert(id, handle.clone());
        Ok(handle)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<SessionHandle>, ApiError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn evict_idle(&self, ttl: chrono::Duration) -> Result<usize, ApiError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // A session whose lock is taken is in use, so it is not idle
        sessions.retain(|_, handle| match handle.try_read() {
            Ok(session) => !session.is_idle(ttl, now),
            Err(_) => true,
        });
        Ok(before - sessions.len())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
