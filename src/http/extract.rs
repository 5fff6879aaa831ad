use std::sync::Arc;

use axum::RequestPartsExt;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use crate::auth::{self, AuthError};
use crate::entities::user::Role;
use crate::http::error::ApiError;
use crate::http::state::AppState;

/// The caller behind a request, resolved from `Authorization: Basic`.
/// Extracting this rejects the request with 401 unless the credentials
/// match a stored user.
pub struct AuthedUser {
    pub username: String,
    pub role: Role,
}

impl FromRequestParts<Arc<AppState>> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(basic)) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| ApiError::Auth(AuthError::MissingCredentials))?;

        let role = auth::authenticate(&state.db.conn, basic.username(), basic.password()).await?;
        tracing::debug!(username = basic.username(), "authenticated request");

        Ok(AuthedUser {
            username: basic.username().to_owned(),
            role,
        })
    }
}

/// An [`AuthedUser`] whose role allows writes. Client-role callers are
/// answered with 401 here, before any request body is read.
pub struct AdminUser(pub AuthedUser);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthedUser::from_request_parts(parts, state).await?;
        if !user.role.can_write() {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

/// `Json` with the rejection folded into the standard error envelope,
/// so malformed bodies answer 400 instead of axum's 422.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// `Path` with the rejection folded into the standard error envelope.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}
