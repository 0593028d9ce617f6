//! Multi-user task tracker: credential storage, stateless session tokens and
//! per-user task CRUD over HTTP.

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod state;
pub mod tasks;
