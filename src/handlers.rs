use crate::errors::AppError;
use crate::gate;
use crate::models::{LoginRequest, Session, SessionResponse, StatsResponse, WatchResponse};
use crate::state::AppState;
use crate::stats;
use crate::ui;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::time::Duration;
use tracing::{info, warn};

pub const SESSION_COOKIE: &str = "session";

/// How long a watch request waits before answering "still signed in".
const WATCH_KEEPALIVE: Duration = Duration::from_secs(25);

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    match active_session(&state, &headers).await? {
        Some(session) => Ok(Html(ui::render_dashboard(&session.identity.email)).into_response()),
        None => Ok(Redirect::to("/login").into_response()),
    }
}

pub async fn login_page() -> Html<&'static str> {
    Html(ui::LOGIN_HTML)
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let session = gate::admit(state.backend.as_ref(), email, &payload.password).await?;
    info!("admin session opened");

    let mut response = Json(SessionResponse {
        email: session.identity.email,
    })
    .into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie(&session.token)?);
    Ok(response)
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        state.backend.sign_out(&token).await?;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, expired_cookie());
    Ok(response)
}

pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AppError> {
    match active_session(&state, &headers).await? {
        Some(session) => Ok(Json(SessionResponse {
            email: session.identity.email,
        })),
        None => Err(AppError::unauthorized("not signed in")),
    }
}

pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    if active_session(&state, &headers).await?.is_none() {
        return Err(AppError::unauthorized("not signed in"));
    }

    let stats = stats::load(state.backend.as_ref()).await.map_err(|err| {
        warn!("failed to load statistics: {err}");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "failed to load statistics".to_string(),
        }
    })?;
    Ok(Json(stats))
}

/// Long-poll for session changes. Resolves when the caller's session is
/// signed out or refreshed, or after [`WATCH_KEEPALIVE`] with the current
/// state. The subscription lives exactly as long as this request future.
pub async fn watch_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WatchResponse>, AppError> {
    // Subscribe first so a sign-out racing the freshness check still lands
    // in the stream.
    let mut events = state.backend.subscribe();
    let Some(session) = active_session(&state, &headers).await? else {
        return Err(AppError::unauthorized("not signed in"));
    };

    let next = tokio::time::timeout(WATCH_KEEPALIVE, async {
        while let Some(change) = events.changed().await {
            if change.token == session.token {
                return Some(change.session);
            }
        }
        None
    })
    .await;

    let response = match next {
        Ok(Some(None)) => WatchResponse {
            signed_in: false,
            email: None,
        },
        Ok(Some(Some(updated))) => WatchResponse {
            signed_in: true,
            email: Some(updated.identity.email),
        },
        // Stream closed or keep-alive elapsed: report the state we hold.
        Ok(None) | Err(_) => WatchResponse {
            signed_in: true,
            email: Some(session.identity.email),
        },
    };
    Ok(Json(response))
}

async fn active_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Session>, AppError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };
    Ok(state.backend.current_session(&token).await?)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|cookie| cookie.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        })
        .map(str::to_string)
}

fn session_cookie(token: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .map_err(AppError::internal)
}

fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok_123; lang=fr"),
        );
        assert_eq!(session_token(&headers), Some("tok_123".to_string()));
    }

    #[test]
    fn missing_cookie_yields_no_token() {
        assert_eq!(session_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
    }
}
