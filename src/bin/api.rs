//! Project API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use project_api::api::{self, ApiError, Config};
use project_api::db::{ConfigError, Database, DbError, PgConfig, PgDatabase, SqliteDatabase};
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(project_api::binary::database))]
    Database(#[from] DbError),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(project_api::binary::config))]
    Config(#[from] ConfigError),

    #[error("API server error: {0}")]
    #[diagnostic(code(project_api::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "project-api")]
#[command(author, version, about = "Users, tasks and projects API server", long_about = None)]
struct Cli {
    /// Host address to bind to (overrides PROJECT_API_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides PROJECT_API_PORT, default 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Use a SQLite database file instead of PostgreSQL
    #[arg(long, value_name = "PATH")]
    sqlite: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Missing .env is fine; real environment variables still apply
    dotenv::dotenv().ok();
    api::init_tracing();

    let cli = Cli::parse();
    serve(cli).await?;
    Ok(())
}

async fn serve(cli: Cli) -> Result<(), BinaryError> {
    let mut config = Config::new();
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    match cli.sqlite {
        Some(path) => {
            info!(path = %path.display(), "Opening SQLite database");
            let db = SqliteDatabase::open(&path).await?;
            start(config, db).await
        }
        None => {
            let pg = PgConfig::from_env()?;
            info!(host = %pg.host, port = pg.port, database = %pg.database, "Connecting to PostgreSQL");
            let db = PgDatabase::connect(&pg).await?;
            start(config, db).await
        }
    }
}

async fn start<D: Database>(config: Config, db: D) -> Result<(), BinaryError> {
    // Run migrations before starting the server
    db.migrate().await?;
    info!("Database migrations complete");

    api::run(config, db).await?;
    Ok(())
}
