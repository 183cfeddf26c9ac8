//! PostgreSQL connection pool and migration management.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use super::{PgConfig, PgProjectRepository, PgTaskRepository, PgUserRepository};
use crate::db::{Database, DbError, DbResult};

// Embed migrations from migrations/postgres at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

/// PostgreSQL database implementation.
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Connect a pool using the given configuration.
    ///
    /// Fails if the first connection cannot be established.
    pub async fn connect(config: &PgConfig) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Connect using a `postgres://` URL.
    pub async fn connect_url(url: &str) -> DbResult<Self> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    /// Access the underlying pool for direct queries.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Database for PgDatabase {
    type Users<'a> = PgUserRepository<'a>;
    type Tasks<'a> = PgTaskRepository<'a>;
    type Projects<'a> = PgProjectRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    fn users(&self) -> Self::Users<'_> {
        PgUserRepository { pool: &self.pool }
    }

    fn tasks(&self) -> Self::Tasks<'_> {
        PgTaskRepository { pool: &self.pool }
    }

    fn projects(&self) -> Self::Projects<'_> {
        PgProjectRepository { pool: &self.pool }
    }
}
