use std::sync::Arc;

use async_trait::async_trait;
use time::macros::format_description;
use tracing::{debug, info};

use crate::{
    auth::repo_types::UserId,
    clock::Clock,
    error::{AppError, AppResult},
    tasks::{
        dto::{CreateTask, PatchTask, UpdateTask},
        repo::TaskStore,
        repo_types::{NewTaskRow, Task},
    },
};

/// Task CRUD. The caller's identity is always an explicit argument; a task
/// owned by anyone else is reported as `NotFound`.
#[async_trait]
pub trait TaskManager: Send + Sync {
    async fn list(&self, user_id: UserId) -> AppResult<Vec<Task>>;

    async fn get_by_id(&self, task_id: i64, user_id: UserId) -> AppResult<Task>;

    async fn create(&self, user_id: UserId, task: CreateTask) -> AppResult<i64>;

    /// Full replace of title, description and completion.
    async fn update(&self, task_id: i64, user_id: UserId, task: UpdateTask) -> AppResult<()>;

    /// Changes only the fields present in `patch`.
    async fn patch(&self, task_id: i64, user_id: UserId, patch: PatchTask) -> AppResult<Task>;

    async fn delete(&self, task_id: i64, user_id: UserId) -> AppResult<()>;
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl TaskManager for TaskService {
    async fn list(&self, user_id: UserId) -> AppResult<Vec<Task>> {
        let tasks = self.store.list_by_user(user_id).await?;
        debug!(%user_id, count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    async fn get_by_id(&self, task_id: i64, user_id: UserId) -> AppResult<Task> {
        self.store
            .find(task_id, user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, user_id: UserId, task: CreateTask) -> AppResult<i64> {
        let created_at = self
            .clock
            .now()
            .format(format_description!("[day]/[month]/[year]"))
            .map_err(|e| AppError::Internal(format!("format created_at: {e}")))?;

        let id = self
            .store
            .insert_task(
                user_id,
                NewTaskRow {
                    title: &task.title,
                    description: &task.description,
                    created_at: &created_at,
                },
            )
            .await?;

        info!(%user_id, task_id = id, "task created");
        Ok(id)
    }

    async fn update(&self, task_id: i64, user_id: UserId, task: UpdateTask) -> AppResult<()> {
        let matched = self
            .store
            .replace(task_id, user_id, &task.title, &task.description, task.is_completed)
            .await?;
        if !matched {
            return Err(AppError::NotFound);
        }
        info!(%user_id, task_id, "task updated");
        Ok(())
    }

    async fn patch(&self, task_id: i64, user_id: UserId, patch: PatchTask) -> AppResult<Task> {
        let task = self
            .store
            .patch(task_id, user_id, &patch)
            .await?
            .ok_or(AppError::NotFound)?;
        info!(%user_id, task_id, "task patched");
        Ok(task)
    }

    async fn delete(&self, task_id: i64, user_id: UserId) -> AppResult<()> {
        if !self.store.remove(task_id, user_id).await? {
            return Err(AppError::NotFound);
        }
        info!(%user_id, task_id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, error::StoreError, memory::MemoryStore};
    use time::macros::datetime;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    fn service() -> TaskService {
        TaskService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(datetime!(2004-03-25 10:30 UTC))),
        )
    }

    fn new_task(title: &str, description: &str) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: description.into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_is_incomplete_with_date() {
        let svc = service();
        let id = svc.create(ALICE, new_task("Buy milk", "2% milk")).await.unwrap();
        assert_eq!(id, 1);

        let task = svc.get_by_id(id, ALICE).await.unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2% milk");
        assert!(!task.is_completed);
        assert_eq!(task.created_at, "25/03/2004");
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered() {
        let svc = service();
        assert!(svc.list(ALICE).await.unwrap().is_empty());

        svc.create(ALICE, new_task("task 1", "a")).await.unwrap();
        svc.create(BOB, new_task("bob's", "b")).await.unwrap();
        svc.create(ALICE, new_task("task 2", "c")).await.unwrap();

        let titles: Vec<_> = svc
            .list(ALICE)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["task 1", "task 2"]);
    }

    #[tokio::test]
    async fn other_users_task_is_not_found_everywhere() {
        let svc = service();
        let id = svc.create(ALICE, new_task("private", "secret")).await.unwrap();

        assert!(matches!(svc.get_by_id(id, BOB).await, Err(AppError::NotFound)));
        assert!(matches!(
            svc.update(id, BOB, UpdateTask::default()).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            svc.patch(
                id,
                BOB,
                PatchTask {
                    is_completed: Some(true),
                    ..Default::default()
                }
            )
            .await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(svc.delete(id, BOB).await, Err(AppError::NotFound)));

        let untouched = svc.get_by_id(id, ALICE).await.unwrap();
        assert_eq!(untouched.title, "private");
        assert!(!untouched.is_completed);
    }

    #[tokio::test]
    async fn missing_id_and_foreign_id_are_indistinguishable() {
        let svc = service();
        let id = svc.create(ALICE, new_task("t", "d")).await.unwrap();
        let foreign = svc.get_by_id(id, BOB).await.unwrap_err();
        let missing = svc.get_by_id(999, BOB).await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(foreign.status(), missing.status());
    }

    #[tokio::test]
    async fn update_replaces_every_mutable_field() {
        let svc = service();
        let id = svc.create(ALICE, new_task("title", "desc")).await.unwrap();

        svc.update(
            id,
            ALICE,
            UpdateTask {
                title: "new title".into(),
                is_completed: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let task = svc.get_by_id(id, ALICE).await.unwrap();
        assert_eq!(task.title, "new title");
        assert_eq!(task.description, "", "omitted field is reset");
        assert!(task.is_completed);
        assert_eq!(task.created_at, "25/03/2004");
    }

    #[tokio::test]
    async fn patch_keeps_absent_fields() {
        let svc = service();
        let id = svc.create(ALICE, new_task("title", "desc")).await.unwrap();

        let task = svc
            .patch(
                id,
                ALICE,
                PatchTask {
                    is_completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(task.title, "title");
        assert_eq!(task.description, "desc");
        assert!(task.is_completed);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let id = svc.create(ALICE, new_task("t", "d")).await.unwrap();
        svc.delete(id, ALICE).await.unwrap();
        assert!(matches!(svc.get_by_id(id, ALICE).await, Err(AppError::NotFound)));
        assert!(matches!(svc.delete(id, ALICE).await, Err(AppError::NotFound)));
    }

    struct BrokenStore;

    #[async_trait]
    impl TaskStore for BrokenStore {
        async fn list_by_user(&self, _o: UserId) -> Result<Vec<Task>, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
        async fn find(&self, _t: i64, _o: UserId) -> Result<Option<Task>, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
        async fn insert_task(&self, _o: UserId, _r: NewTaskRow<'_>) -> Result<i64, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
        async fn replace(
            &self,
            _t: i64,
            _o: UserId,
            _title: &str,
            _d: &str,
            _c: bool,
        ) -> Result<bool, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
        async fn patch(
            &self,
            _t: i64,
            _o: UserId,
            _p: &PatchTask,
        ) -> Result<Option<Task>, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
        async fn remove(&self, _t: i64, _o: UserId) -> Result<bool, StoreError> {
            Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn storage_failure_is_not_masked_as_not_found() {
        let svc = TaskService::new(
            Arc::new(BrokenStore),
            Arc::new(ManualClock::new(datetime!(2004-03-25 10:30 UTC))),
        );
        assert!(matches!(svc.list(ALICE).await, Err(AppError::StorageFailure(_))));
        assert!(matches!(svc.get_by_id(1, ALICE).await, Err(AppError::StorageFailure(_))));
        assert!(matches!(svc.delete(1, ALICE).await, Err(AppError::StorageFailure(_))));
    }
}
