use crate::backend::BackendError;
use crate::gate::GateError;
use axum::http::StatusCode;

/// Error shape at the HTTP boundary: a status and a user-facing message.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        let status = match &err {
            GateError::InvalidCredentials(_) | GateError::MissingIdentity => {
                StatusCode::UNAUTHORIZED
            }
            GateError::ProfileNotFound | GateError::NotAdmin => StatusCode::FORBIDDEN,
            GateError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
