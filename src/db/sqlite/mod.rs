//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module. It backs local single-file
//! deployments and the in-memory databases used by the test suite.

mod connection;
mod project;
mod task;
mod user;

#[cfg(test)]
mod project_test;

pub use connection::SqliteDatabase;
pub use project::SqliteProjectRepository;
pub use task::SqliteTaskRepository;
pub use user::SqliteUserRepository;
