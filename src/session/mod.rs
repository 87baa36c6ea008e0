//! The session store: single source of truth for who is logged in.
//!
//! The in-memory value lives in a `watch` channel, so readers get the last
//! value synchronously and subscribers are pushed every change. Storage
//! failures are logged and swallowed; they degrade to "no session" rather
//! than escaping the store.

mod filesystem;
mod memory;
mod storage;

pub use filesystem::FilesystemSessionStorage;
pub use memory::MemorySessionStorage;
pub use storage::{SessionStorage, LEGACY_TOKEN_KEY, SESSION_KEY};

use crate::error::{SessionError, StorageError};
use crate::models::{Session, TokenPair};
use std::sync::Arc;
use tokio::sync::watch;

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Create the store, loading any persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let initial = load_session(storage.as_ref());
        let (current, _) = watch::channel(initial);
        Self { storage, current }
    }

    pub fn get_current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Access token of the current session, if any.
    pub fn access_token(&self) -> Option<String> {
        self.current
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Persist `session` and make it current.
    pub fn set_current(&self, session: Session) -> Result<(), SessionError> {
        if !session.is_complete() {
            return Err(SessionError::Incomplete);
        }
        self.persist(&session);
        tracing::debug!(user_id = %session.id, "session stored");
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Replace only the token pair of the current session.
    pub fn update_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Session, SessionError> {
        let tokens = TokenPair::new(access_token, refresh_token);
        if !tokens.is_complete() {
            return Err(SessionError::Incomplete);
        }

        let mut updated = None;
        self.current.send_if_modified(|current| match current {
            Some(session) => {
                *session = session.with_tokens(tokens);
                updated = Some(session.clone());
                true
            }
            None => false,
        });

        let session = updated.ok_or(SessionError::NoSession)?;
        self.persist(&session);
        tracing::debug!(user_id = %session.id, "session tokens updated");
        Ok(session)
    }

    /// Drop the session from memory and every persisted key.
    pub fn clear(&self) {
        for key in [SESSION_KEY, LEGACY_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove persisted session key");
            }
        }
        self.current.send_replace(None);
    }

    fn persist(&self, session: &Session) {
        let result = serde_json::to_string(session)
            .map_err(StorageError::from)
            .and_then(|record| self.storage.set(SESSION_KEY, &record));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}

fn load_session(storage: &dyn SessionStorage) -> Option<Session> {
    let record = match storage.get(SESSION_KEY) {
        Ok(record) => record?,
        Err(e) => {
            tracing::warn!(error = %e, "could not read persisted session");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&record) {
        Ok(session) if session.is_complete() => Some(session),
        Ok(_) => {
            tracing::warn!("persisted session is missing tokens, ignoring it");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "persisted session is corrupt, ignoring it");
            None
        }
    }
}
