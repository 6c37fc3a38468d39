//! Postgres connection pool and migrations.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

/// Shared Postgres pool handed to every repository function.
pub type DbPool = PgPool;

/// Connection settings for [`connect`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a query waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Open a pool as described by `config`.  Fails if the first connection
/// cannot be established.
pub async fn connect(config: &PoolConfig) -> Result<DbPool, DbError> {
    info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "connecting to database"
    );
    let pool = config.options().connect(&config.database_url).await?;
    Ok(pool)
}

/// Apply the embedded migrations from the workspace `migrations/` directory.
///
/// The `jobs` table's primary key is what turns duplicate creates into
/// [`DbError::Conflict`], so this must have run before the API serves writes.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PoolConfig::new("postgres://localhost/jobs");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_settings_reach_pool_options() {
        let config = PoolConfig::new("postgres://localhost/jobs")
            .max_connections(3)
            .acquire_timeout(Duration::from_secs(5));

        let options = config.options();

        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(5));
    }
}
