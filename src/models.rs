use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const SESSION_TTL_DAYS: i64 = 7;

/// Authenticated user record as the backend collaborator reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        let now = Utc::now();
        Self {
            token: uuid::Uuid::new_v4().to_string(),
            identity,
            created_at: now,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Authorization record keyed by identity id. Access requires `role == "admin"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Visit count for one calendar day. Derived on every stats load, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: String,
    pub count: u64,
}

/// Fixture loaded into the in-memory backend at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub visits: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub searches: u64,
}

/// A user without a role gets an auth record but no profile row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub visits_by_day: Vec<DayBucket>,
    pub total_visits: u64,
    pub search_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WatchResponse {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
