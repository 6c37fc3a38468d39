//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! [`JobStore`] is the seam the HTTP layer talks to; [`PgJobStore`] backs it
//! with Postgres and [`InMemoryJobStore`] with a map for tests.

pub mod jobs;
pub mod memory;

use async_trait::async_trait;

use crate::{DbError, DbPool, JobFilter, JobRow, JobUpdate, NewJob};

pub use memory::InMemoryJobStore;

/// CRUD contract for the `jobs` resource.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job; [`DbError::Conflict`] if the id is taken.
    async fn create(&self, job: NewJob) -> Result<JobRow, DbError>;

    async fn get(&self, id: &str) -> Result<JobRow, DbError>;

    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRow>, DbError>;

    /// Partial update; [`DbError::InvalidRequest`] if `update` sets nothing.
    async fn update(&self, id: &str, update: JobUpdate) -> Result<JobRow, DbError>;

    async fn delete(&self, id: &str) -> Result<(), DbError>;
}

/// [`JobStore`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(&self, job: NewJob) -> Result<JobRow, DbError> {
        jobs::create_job(&self.pool, job).await
    }

    async fn get(&self, id: &str) -> Result<JobRow, DbError> {
        jobs::get_job(&self.pool, id).await
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRow>, DbError> {
        jobs::list_jobs(&self.pool, filter).await
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<JobRow, DbError> {
        jobs::update_job(&self.pool, id, update).await
    }

    async fn delete(&self, id: &str) -> Result<(), DbError> {
        jobs::delete_job(&self.pool, id).await
    }
}
