use serde::{Deserialize, Serialize};

use crate::tasks::repo_types::Task;

/// Body of `POST /tasks`. A missing description is stored as empty.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PUT /tasks/:id`. Every field is replaced; missing ones fall back to
/// their defaults and overwrite what is stored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Body of `PATCH /tasks/:id`. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PatchTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct CreatedTask {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
