use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::app::{AppOptions, BlogApp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One browser session: its application state and when it was last used.
#[derive(Debug)]
pub struct Session {
    pub app: Mutex<BlogApp>,
    touched: std::sync::Mutex<Instant>,
}

impl Session {
    fn new(options: AppOptions) -> Self {
        Self {
            app: Mutex::new(BlogApp::new(options)),
            touched: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.touched.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let touched = *self.touched.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        now.saturating_duration_since(touched)
    }
}

/// Live sessions, keyed by id. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, options: AppOptions) -> (SessionId, Arc<Session>) {
        let id = SessionId(Uuid::new_v4());
        let session = Arc::new(Session::new(options));
        self.sessions.write().await.insert(id, session.clone());
        tracing::info!(session = %id, "session created");
        (id, session)
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "session closed");
        }
        removed
    }

    /// Drop sessions unused for longer than `max_idle`; returns how many.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= max_idle);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, "purged idle sessions");
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
