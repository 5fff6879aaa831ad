pub mod actors;
pub mod films;

use std::sync::Arc;

use axum::extract::State;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::state::AppState;

/// Envelope for endpoints that return no record, like deletes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub error: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        StatusResponse {
            success: true,
            error: String::new(),
        }
    }
}

/// Liveness probe. Answers without credentials so deploy tooling can
/// poll it, but still round-trips a query to prove the database is up.
pub async fn healthcheck(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    state
        .db
        .conn
        .execute_unprepared("SELECT 1")
        .await
        .map_err(|err| ApiError::Backend(err.to_string()))?;
    Ok("OK")
}
