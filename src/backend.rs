//! Contract for the remote auth/data collaborator.
//!
//! The hosted service this dashboard reads from is not part of this
//! repository; handlers and views only ever see this trait. The in-memory
//! implementation in [`crate::memory`] stands in for it during development
//! and in tests.

use crate::models::{Profile, Session, VisitRecord};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session not found or expired")]
    SessionNotFound,

    #[error("{entity} with {key}={value} not found")]
    NotFound {
        entity: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("store error: {message}")]
    Store { message: String },
}

/// A change to one session. `session: None` means it was signed out.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub token: String,
    pub session: Option<Session>,
}

/// Live feed of session changes. Dropping it releases the subscription.
pub struct SessionEvents {
    rx: broadcast::Receiver<SessionChange>,
}

impl SessionEvents {
    pub(crate) fn new(rx: broadcast::Receiver<SessionChange>) -> Self {
        Self { rx }
    }

    /// Waits for the next change. Returns `None` once the backend is gone.
    /// A lagged receiver skips ahead; only the latest session state matters.
    pub async fn changed(&mut self) -> Option<SessionChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Attempts to establish a session for the given credentials.
    ///
    /// `Ok(None)` covers the degenerate case of the collaborator accepting
    /// the credentials without returning an identity.
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<Option<Session>, BackendError>;

    /// Revokes the session behind `token`. Unknown tokens are acknowledged.
    async fn sign_out(&self, token: &str) -> Result<(), BackendError>;

    /// The live session behind `token`, if any. Expired sessions read as absent.
    async fn current_session(&self, token: &str) -> Result<Option<Session>, BackendError>;

    fn subscribe(&self) -> SessionEvents;

    async fn profile(&self, id: &str) -> Result<Option<Profile>, BackendError>;

    /// All visit records, newest first.
    async fn visits(&self) -> Result<Vec<VisitRecord>, BackendError>;

    async fn search_count(&self) -> Result<u64, BackendError>;
}
