use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    auth::repo_types::UserId,
    error::StoreError,
    tasks::{
        dto::PatchTask,
        repo_types::{NewTaskRow, Task},
    },
};

/// Task persistence. Every statement filters on both the task id and the
/// owner, so a task owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_by_user(&self, owner: UserId) -> Result<Vec<Task>, StoreError>;

    async fn find(&self, task_id: i64, owner: UserId) -> Result<Option<Task>, StoreError>;

    async fn insert_task(&self, owner: UserId, row: NewTaskRow<'_>) -> Result<i64, StoreError>;

    /// Returns `false` when no row matched.
    async fn replace(
        &self,
        task_id: i64,
        owner: UserId,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<bool, StoreError>;

    async fn patch(
        &self,
        task_id: i64,
        owner: UserId,
        patch: &PatchTask,
    ) -> Result<Option<Task>, StoreError>;

    /// Returns `false` when no row matched.
    async fn remove(&self, task_id: i64, owner: UserId) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_by_user(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, task_id: i64, owner: UserId) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn insert_task(&self, owner: UserId, row: NewTaskRow<'_>) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tasks (user_id, title, description, is_completed, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(row.title)
        .bind(row.description)
        .bind(row.created_at)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn replace(
        &self,
        task_id: i64,
        owner: UserId,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<bool, StoreError> {
        let done = sqlx::query(
            r#"
            UPDATE tasks
               SET title = $1, description = $2, is_completed = $3
             WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(is_completed)
        .bind(task_id)
        .bind(owner)
        .execute(&self.db)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn patch(
        &self,
        task_id: i64,
        owner: UserId,
        patch: &PatchTask,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET title = COALESCE($1, title),
                   description = COALESCE($2, description),
                   is_completed = COALESCE($3, is_completed)
             WHERE id = $4 AND user_id = $5
            RETURNING id, user_id, title, description, is_completed, created_at
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.is_completed)
        .bind(task_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn remove(&self, task_id: i64, owner: UserId) -> Result<bool, StoreError> {
        let done = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
