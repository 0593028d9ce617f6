use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{auth::repo_types::UserId, error::AppError, state::AppState};

/// Identity resolved by [`authorize`] for the current request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingCredential)?;

    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or(AppError::MissingCredential)?
        .trim();

    if token.is_empty() {
        return Err(AppError::MissingCredential);
    }
    Ok(token)
}

/// Rejects the request unless it carries a valid session token; otherwise
/// stores [`AuthUser`] in the request extensions for the handler.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).map_err(|e| {
        debug!(uri = %request.uri(), "no bearer token");
        e
    })?;

    let user_id = state.auth.validate_token(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        e
    })?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::MissingCredential)
    }
}
