use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password, DUMMY_HASH},
        repo::CredentialStore,
        repo_types::UserId,
    },
    clock::Clock,
    error::{AppError, AppResult, StoreError},
};

const MAX_USERNAME_CHARS: usize = 255;
const MAX_PASSWORD_BYTES: usize = 1024;

/// Registration, login and session token validation.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> AppResult<UserId>;

    /// Unknown user and wrong password both yield `InvalidCredentials`.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<String>;

    /// Stateless: only the signature and the expiry are checked.
    fn validate_token(&self, token: &str) -> AppResult<UserId>;
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    keys: JwtKeys,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, keys: JwtKeys, clock: Arc<dyn Clock>) -> Self {
        Self { store, keys, clock }
    }
}

#[async_trait]
impl Authenticator for AuthService {
    async fn register(&self, username: &str, password: &str) -> AppResult<UserId> {
        if username.trim().is_empty() {
            return Err(AppError::InvalidInput("username must not be empty".into()));
        }
        if username.chars().count() > MAX_USERNAME_CHARS {
            return Err(AppError::InvalidInput("username is too long".into()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("password must not be empty".into()));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::InvalidInput("password is too long".into()));
        }

        let plain = password.to_owned();
        let hash = blocking(move || hash_password(&plain)).await?;

        // The unique index decides races between concurrent registrations.
        let user_id = match self.store.insert_user(username, &hash).await {
            Ok(id) => id,
            Err(StoreError::Conflict) => {
                warn!(%username, "username already registered");
                return Err(AppError::DuplicateUsername);
            }
            Err(e) => return Err(e.into()),
        };

        info!(%user_id, %username, "user registered");
        Ok(user_id)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<String> {
        let plain = password.to_owned();
        let Some(user) = self.store.find_by_username(username).await? else {
            // Burn the same amount of work as a real check.
            let _ = blocking(move || verify_password(&plain, DUMMY_HASH)).await;
            warn!(%username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        };

        let stored = user.password_hash.clone();
        if !blocking(move || verify_password(&plain, &stored)).await? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, &user.username, self.clock.now())?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    fn validate_token(&self, token: &str) -> AppResult<UserId> {
        let claims = self.keys.verify(token, self.clock.now())?;
        Ok(UserId(claims.user_id))
    }
}

async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
}
