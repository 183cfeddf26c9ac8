//! CRUD REST API for users, tasks and projects.
//!
//! - [`db`]: storage-agnostic models and repository traits, with PostgreSQL
//!   and SQLite backends
//! - [`api`]: axum router and handlers generic over [`db::Database`]

pub mod api;
pub mod db;
