use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the services and rendered by the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("invalid token")]
    TokenInvalid,

    #[error("token expired")]
    TokenExpired,

    #[error("missing or malformed Authorization header")]
    MissingCredential,

    #[error("task not found")]
    NotFound,

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::TokenInvalid
            | AppError::TokenExpired
            | AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StorageFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::StorageFailure(detail) => {
                error!(error = %detail, "storage failure");
                "storage unavailable".to_string()
            }
            AppError::Internal(detail) => {
                error!(error = %detail, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Failures reported by the credential and task stores. "No rows" is not an
/// error; stores return `Option`/`bool` for that.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,

    #[error("database error: {0}")]
    Backend(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Backend(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StorageFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn auth_failures_map_to_unauthorized() {
        for e in [
            AppError::InvalidCredentials,
            AppError::TokenInvalid,
            AppError::TokenExpired,
            AppError::MissingCredential,
        ] {
            assert_eq!(e.status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(AppError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn storage_detail_is_not_exposed() {
        let res = AppError::StorageFailure("connection refused to 10.0.0.3".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("storage unavailable"));
        assert!(!body.contains("10.0.0.3"));
    }

    #[test]
    fn pool_timeout_is_a_backend_failure() {
        let e = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(e, StoreError::Backend(_)));
        assert!(matches!(AppError::from(e), AppError::StorageFailure(_)));
    }
}
