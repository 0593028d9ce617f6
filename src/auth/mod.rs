use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::{authorize, AuthUser};
pub use repo_types::UserId;
pub use services::{AuthService, Authenticator};

/// Public endpoints: register and login.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Endpoints that expect an authenticated caller.
pub fn protected_router() -> Router<AppState> {
    handlers::session_routes()
}
