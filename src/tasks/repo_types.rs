use serde::Serialize;
use sqlx::FromRow;

use crate::auth::repo_types::UserId;

/// Task record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: String, // DD/MM/YYYY, set once at creation
}

/// Columns written when a task is created.
#[derive(Debug)]
pub struct NewTaskRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub created_at: &'a str,
}
