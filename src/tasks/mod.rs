pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::{TaskManager, TaskService};

/// All task routes; every one of them expects an authenticated caller.
pub fn router() -> Router<AppState> {
    handlers::task_routes()
}
