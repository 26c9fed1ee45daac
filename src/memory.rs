//! In-memory stand-in for the hosted backend, seeded from a fixture file.

use crate::backend::{Backend, BackendError, SessionChange, SessionEvents};
use crate::models::{Identity, Profile, SeedData, Session, VisitRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
struct Credential {
    identity: Identity,
    password: String,
}

pub struct MemoryBackend {
    credentials: RwLock<HashMap<String, Credential>>,
    profiles: RwLock<HashMap<String, Profile>>,
    sessions: RwLock<HashMap<String, Session>>,
    visits: Vec<VisitRecord>,
    searches: u64,
    changes: broadcast::Sender<SessionChange>,
    sign_outs: AtomicU64,
    profile_reads: AtomicU64,
}

impl MemoryBackend {
    pub fn from_seed(seed: SeedData) -> Self {
        let mut credentials = HashMap::new();
        let mut profiles = HashMap::new();
        for user in seed.users {
            let identity = Identity {
                id: uuid::Uuid::new_v4().to_string(),
                email: user.email.clone(),
            };
            if let Some(role) = user.role {
                profiles.insert(
                    identity.id.clone(),
                    Profile {
                        id: identity.id.clone(),
                        role,
                    },
                );
            }
            credentials.insert(
                user.email,
                Credential {
                    identity,
                    password: user.password,
                },
            );
        }

        let mut visits: Vec<VisitRecord> = seed
            .visits
            .into_iter()
            .map(|created_at| VisitRecord {
                id: uuid::Uuid::new_v4().to_string(),
                created_at,
            })
            .collect();
        visits.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            credentials: RwLock::new(credentials),
            profiles: RwLock::new(profiles),
            sessions: RwLock::new(HashMap::new()),
            visits,
            searches: seed.searches,
            changes,
            sign_outs: AtomicU64::new(0),
            profile_reads: AtomicU64::new(0),
        }
    }

    /// Number of live (possibly expired) sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of `sign_out` calls received.
    pub fn sign_out_count(&self) -> u64 {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Number of `profile` reads received.
    pub fn profile_read_count(&self) -> u64 {
        self.profile_reads.load(Ordering::SeqCst)
    }

    /// Number of live session-change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::from_seed(SeedData::default())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, BackendError> {
        let identity = {
            let credentials = self.credentials.read().await;
            credentials
                .get(email)
                .filter(|credential| credential.password == password)
                .map(|credential| credential.identity.clone())
                .ok_or(BackendError::InvalidCredentials)?
        };

        let session = Session::new(identity);
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        let _ = self.changes.send(SessionChange {
            token: session.token.clone(),
            session: Some(session.clone()),
        });

        Ok(Some(session))
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        let removed = self.sessions.write().await.remove(token);
        if removed.is_some() {
            let _ = self.changes.send(SessionChange {
                token: token.to_string(),
                session: None,
            });
        }
        Ok(())
    }

    async fn current_session(&self, token: &str) -> Result<Option<Session>, BackendError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|session| !session.is_expired())
            .cloned())
    }

    fn subscribe(&self) -> SessionEvents {
        SessionEvents::new(self.changes.subscribe())
    }

    async fn profile(&self, id: &str) -> Result<Option<Profile>, BackendError> {
        self.profile_reads.fetch_add(1, Ordering::SeqCst);
        let profiles = self.profiles.read().await;
        Ok(profiles.get(id).cloned())
    }

    async fn visits(&self) -> Result<Vec<VisitRecord>, BackendError> {
        Ok(self.visits.clone())
    }

    async fn search_count(&self) -> Result<u64, BackendError> {
        Ok(self.searches)
    }
}
