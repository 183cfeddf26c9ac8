//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends (PostgreSQL, SQLite) to be swapped
//! without changing the HTTP layer.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (User, Task, Project)
//! - `repository`: Trait definitions for data access
//! - `postgres`: Production backend configured from the environment
//! - `sqlite`: File and in-memory backend

mod error;
mod models;
mod repository;
pub mod utils;

pub mod postgres;
pub mod sqlite;

#[cfg(test)]
mod models_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use postgres::{ConfigError, PgConfig, PgDatabase};
pub use repository::*;
pub use sqlite::SqliteDatabase;
