use crate::gate::ADMIN_ROLE;
use crate::models::{SeedData, SeedUser};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_seed_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/seed.json")
}

/// Loads the backend fixture. A missing or unreadable file yields an empty
/// seed so the server still starts.
pub async fn load_seed(path: &Path) -> SeedData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(seed) => seed,
            Err(err) => {
                error!("failed to parse seed file: {err}");
                SeedData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => SeedData::default(),
        Err(err) => {
            error!("failed to read seed file: {err}");
            SeedData::default()
        }
    }
}

/// Adds (or replaces) an admin account when ADMIN_EMAIL and ADMIN_PASSWORD
/// are both set.
pub fn apply_admin_override(seed: &mut SeedData) {
    let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) else {
        return;
    };

    seed.users.retain(|user| user.email != email);
    seed.users.push(SeedUser {
        email,
        password,
        role: Some(ADMIN_ROLE.to_string()),
    });
}
