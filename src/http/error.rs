use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Errors surfaced to HTTP clients. Each variant renders the standard
/// `{"success": false, "error": ...}` envelope with its status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Auth(AuthError),
    #[error("wrong access level")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::UnknownUser | AuthError::WrongPassword => {
                ApiError::Auth(err)
            }
            AuthError::Hash(_) | AuthError::Database(_) => ApiError::Backend(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FilmNotFound(_) | StoreError::ActorNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            StoreError::InvalidQuery(_) => ApiError::Validation(err.to_string()),
            StoreError::Database(_) => ApiError::Backend(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Role failures keep the 401 the API has always answered with,
        // rather than 403.
        let status = match &self {
            ApiError::Auth(_) | ApiError::Forbidden => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = match &self {
            ApiError::Backend(detail) => {
                tracing::error!(%detail, "request failed");
                "something went wrong".to_owned()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            success: false,
            error,
        };
        (status, Json(body)).into_response()
    }
}
