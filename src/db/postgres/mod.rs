//! PostgreSQL implementation of the database traits.
//!
//! The production backend. Connection settings come from `POSTGRES_*`
//! environment variables (see [`PgConfig`]).

mod config;
mod connection;
mod project;
mod task;
mod user;

#[cfg(test)]
mod config_test;

pub use config::{ConfigError, PgConfig};
pub use connection::PgDatabase;
pub use project::PgProjectRepository;
pub use task::PgTaskRepository;
pub use user::PgUserRepository;
