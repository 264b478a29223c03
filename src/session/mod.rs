//! Explicit session object for backend authorization.
//!
//! The session is loaded once at startup from a [`SessionStore`], shared with
//! the API client, and invalidated on logout or when the backend rejects the
//! token.

use chrono::{NaiveDateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_email: None,
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Persistence backend for the session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<Session>>;
    fn save(&self, session: &Session) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// In-memory store seeded from configuration.
#[derive(Debug, Default)]
pub struct StaticSessionStore {
    session: RwLock<Option<Session>>,
}

impl StaticSessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for StaticSessionStore {
    fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self.session.read().clone())
    }

    fn save(&self, session: &Session) -> SessionResult<()> {
        *self.session.write() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.session.write() = None;
        Ok(())
    }
}

/// Shared, process-wide session state.
pub struct SessionHandle {
    current: RwLock<Option<Session>>,
    store: Box<dyn SessionStore>,
}

impl SessionHandle {
    /// Loads the session from `store`. Expired sessions are discarded.
    pub fn load(store: Box<dyn SessionStore>) -> SessionResult<Self> {
        let now = Utc::now().naive_utc();
        let session = store.load()?.filter(|session| {
            let expired = session.is_expired(now);
            if expired {
                log::warn!("Stored session has expired, ignoring it");
            }
            !expired
        });

        Ok(Self {
            current: RwLock::new(session),
            store,
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// Bearer token of a live session.
    pub fn token(&self) -> Option<String> {
        let now = Utc::now().naive_utc();
        self.current
            .read()
            .as_ref()
            .filter(|session| !session.is_expired(now))
            .map(|session| session.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn replace(&self, session: Session) -> SessionResult<()> {
        self.store.save(&session)?;
        *self.current.write() = Some(session);
        Ok(())
    }

    /// Drops the session from memory and storage.
    pub fn invalidate(&self) -> SessionResult<()> {
        *self.current.write() = None;
        self.store.clear()
    }
}
