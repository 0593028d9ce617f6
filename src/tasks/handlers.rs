use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    tasks::dto::{CreateTask, CreatedTask, Message, PatchTask, TaskEnvelope, TaskList, UpdateTask},
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task)
                .put(update_task)
                .patch(patch_task)
                .delete(delete_task),
        )
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<TaskList>> {
    let tasks = state.tasks.list(user_id).await?;
    Ok(Json(TaskList { tasks }))
}

#[instrument(skip(state, id))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<TaskEnvelope>> {
    let task = state.tasks.get_by_id(task_id(id)?, user_id).await?;
    Ok(Json(TaskEnvelope { task }))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedTask>)> {
    let Json(body) = payload.map_err(bad_body)?;
    let id = state.tasks.create(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(CreatedTask { id })))
}

#[instrument(skip(state, id, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> AppResult<Json<Message>> {
    let task_id = task_id(id)?;
    let Json(body) = payload.map_err(bad_body)?;
    state.tasks.update(task_id, user_id, body).await?;
    Ok(Json(Message {
        message: "Task was updated",
    }))
}

#[instrument(skip(state, id, payload))]
pub async fn patch_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatchTask>, JsonRejection>,
) -> AppResult<Json<TaskEnvelope>> {
    let task_id = task_id(id)?;
    let Json(body) = payload.map_err(bad_body)?;
    let task = state.tasks.patch(task_id, user_id, body).await?;
    Ok(Json(TaskEnvelope { task }))
}

#[instrument(skip(state, id))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Message>> {
    state.tasks.delete(task_id(id)?, user_id).await?;
    Ok(Json(Message {
        message: "Task was deleted",
    }))
}

fn task_id(id: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::InvalidInput(format!("task id: {}", e.body_text())))
}

fn bad_body(e: JsonRejection) -> AppError {
    AppError::InvalidInput(e.body_text())
}
