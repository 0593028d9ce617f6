use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{Credentials, LogoutResponse, Registered, TokenResponse},
        extractors::AuthUser,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Routes that need a session; the caller wraps them in the authorizer.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<Registered>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    state.auth.register(&body.username, &body.password).await?;
    Ok(Json(Registered {}))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let token = state.auth.authenticate(&body.username, &body.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// Tokens are not revoked server side; the client drops its copy.
#[instrument]
pub async fn logout(AuthUser(user_id): AuthUser) -> Json<LogoutResponse> {
    tracing::info!(%user_id, "logout");
    Json(LogoutResponse { message: "Goodbye!" })
}
