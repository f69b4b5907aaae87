//! In-memory review sessions.
//!
//! Each upload gets a fresh `request_id`. A result is committed only if its
//! request is still the session's current one, so a slow review from an
//! earlier upload can never overwrite a newer upload or a reset.
//!
//! Sessions idle for longer than the store's TTL are swept out whenever a new
//! session is created.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::review::report::ReportView;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading {
        request_id: Uuid,
        file_name: String,
        started_at: DateTime<Utc>,
    },
    Complete {
        request_id: Uuid,
        report: Box<ReportView>,
        completed_at: DateTime<Utc>,
    },
}

impl SessionState {
    fn request_id(&self) -> Option<Uuid> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { request_id, .. } | SessionState::Complete { request_id, .. } => {
                Some(*request_id)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Last time the session was created, uploaded to, completed or reset.
    pub last_active_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: SessionState,
}

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
        }
    }

    pub async fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            created_at: now,
            last_active_at: now,
            state: SessionState::Idle,
        };

        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| {
            now.signed_duration_since(s.last_active_at)
                .to_std()
                .map_or(true, |idle| idle <= self.ttl)
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        sessions.insert(session.id, session.clone());
        debug!("Created session {}", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Starts a new upload, dropping whatever the session held before.
    /// Returns the request id the result must be committed under.
    pub async fn begin_upload(&self, id: Uuid, file_name: &str) -> Option<Uuid> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        let request_id = Uuid::new_v4();
        session.last_active_at = Utc::now();
        if let Some(previous) = session.state.request_id() {
            debug!("Session {id}: upload {request_id} supersedes {previous}");
        }
        session.state = SessionState::Loading {
            request_id,
            file_name: file_name.to_string(),
            started_at: Utc::now(),
        };
        Some(request_id)
    }

    /// Stores the finished report if `request_id` is still current.
    /// Returns `false` when the result was discarded.
    pub async fn complete(&self, id: Uuid, request_id: Uuid, report: ReportView) -> bool {
        let mut sessions = self.inner.write().await;
        let Some(session) = sessions.get_mut(&id) else {
            return false;
        };
        if !matches!(session.state, SessionState::Loading { request_id: current, .. } if current == request_id)
        {
            info!("Session {id}: discarding result of superseded upload {request_id}");
            return false;
        }
        let now = Utc::now();
        session.last_active_at = now;
        session.state = SessionState::Complete {
            request_id,
            report: Box::new(report),
            completed_at: now,
        };
        true
    }

    /// Resets to idle after a failed review, unless a newer upload took over.
    pub async fn fail(&self, id: Uuid, request_id: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) if session.state.request_id() == Some(request_id) => {
                session.last_active_at = Utc::now();
                session.state = SessionState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Explicit "new analysis": back to idle regardless of what is in flight.
    pub async fn reset(&self, id: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.last_active_at = Utc::now();
                session.state = SessionState::Idle;
                true
            }
            None => false,
        }
    }
}
