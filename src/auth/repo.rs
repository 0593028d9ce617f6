use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    auth::repo_types::{User, UserId},
    error::StoreError,
};

/// Persistent mapping from username to salted password hash.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError> {
        let id = sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }
}
