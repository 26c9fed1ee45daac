//! Session gate: credential check followed by the profile/role authorization.

use crate::backend::{Backend, BackendError};
use crate::models::Session;
use thiserror::Error;
use tracing::warn;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum GateError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("user not found")]
    MissingIdentity,

    #[error("access denied: profile not found")]
    ProfileNotFound,

    #[error("access denied: admins only")]
    NotAdmin,

    #[error("an unexpected error occurred")]
    Backend(#[from] BackendError),
}

/// Runs the whole admission sequence against the backend collaborator.
///
/// A session that exists but fails the profile or role check is revoked
/// before the rejection is returned, so no half-authorized session outlives
/// this call.
pub async fn admit(
    backend: &dyn Backend,
    email: &str,
    password: &str,
) -> Result<Session, GateError> {
    let session = match backend.sign_in(email, password).await {
        Ok(Some(session)) => session,
        Ok(None) => return Err(GateError::MissingIdentity),
        Err(err @ BackendError::InvalidCredentials) => {
            return Err(GateError::InvalidCredentials(err.to_string()));
        }
        Err(err) => {
            warn!("sign-in failed: {err}");
            return Err(GateError::Backend(err));
        }
    };

    let profile = match backend.profile(&session.identity.id).await {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => None,
        Err(err) => {
            warn!("profile lookup failed: {err}");
            None
        }
    };

    let Some(profile) = profile else {
        revoke(backend, &session.token).await;
        return Err(GateError::ProfileNotFound);
    };

    if profile.role != ADMIN_ROLE {
        revoke(backend, &session.token).await;
        return Err(GateError::NotAdmin);
    }

    Ok(session)
}

async fn revoke(backend: &dyn Backend, token: &str) {
    if let Err(err) = backend.sign_out(token).await {
        warn!("failed to revoke session: {err}");
    }
}
