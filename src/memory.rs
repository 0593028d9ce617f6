//! In-process implementation of both stores. Ids start at 1 and are never
//! reused, mirroring `BIGSERIAL`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    auth::{
        repo::CredentialStore,
        repo_types::{User, UserId},
    },
    error::StoreError,
    tasks::{
        dto::PatchTask,
        repo::TaskStore,
        repo_types::{NewTaskRow, Task},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: i64,
    next_task_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserId, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict);
        }
        tables.next_user_id += 1;
        let id = UserId(tables.next_user_id);
        tables.users.push(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(id)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_by_user(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find(&self, task_id: i64, owner: UserId) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == task_id && t.user_id == owner)
            .cloned())
    }

    async fn insert_task(&self, owner: UserId, row: NewTaskRow<'_>) -> Result<i64, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_task_id += 1;
        let id = tables.next_task_id;
        tables.tasks.push(Task {
            id,
            user_id: owner,
            title: row.title.to_string(),
            description: row.description.to_string(),
            is_completed: false,
            created_at: row.created_at.to_string(),
        });
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
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == owner)
        else {
            return Ok(false);
        };
        task.title = title.to_string();
        task.description = description.to_string();
        task.is_completed = is_completed;
        Ok(true)
    }

    async fn patch(
        &self,
        task_id: i64,
        owner: UserId,
        patch: &PatchTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.user_id == owner)
        else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(done) = patch.is_completed {
            task.is_completed = done;
        }
        Ok(Some(task.clone()))
    }

    async fn remove(&self, task_id: i64, owner: UserId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|t| !(t.id == task_id && t.user_id == owner));
        Ok(tables.tasks.len() < before)
    }
}
