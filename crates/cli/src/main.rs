//! `jobboard` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — start the API server.
//! - `migrate` — run pending database migrations.

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::pool::{self, PoolConfig};

#[derive(Parser)]
#[command(name = "jobboard", about = "Jobs resource API server", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[arg(long, default_value_t = PoolConfig::DEFAULT_MAX_CONNECTIONS)]
        max_connections: u32,
        /// Seconds a request waits for a free database connection.
        #[arg(long, default_value_t = 30)]
        acquire_timeout_secs: u64,
        /// Apply pending migrations before serving.
        #[arg(long)]
        migrate: bool,
    },
    /// Run pending database migrations.
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, database_url, max_connections, acquire_timeout_secs, migrate } => {
            let config = PoolConfig::new(database_url)
                .max_connections(max_connections)
                .acquire_timeout(Duration::from_secs(acquire_timeout_secs));
            let pool = pool::connect(&config).await.context("failed to connect to database")?;
            if migrate {
                pool::run_migrations(&pool).await.context("migration failed")?;
            }
            info!("Starting API server on {bind}");
            api::serve(&bind, pool).await.context("API server failed")?;
        }
        Command::Migrate { database_url } => {
            let config = PoolConfig::new(database_url).max_connections(2);
            let pool = pool::connect(&config).await.context("failed to connect to database")?;
            pool::run_migrations(&pool).await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
    }

    Ok(())
}
