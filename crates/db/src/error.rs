//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The request can never produce a valid statement (e.g. an empty update).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    pub(crate) fn job_not_found(id: &str) -> Self {
        Self::NotFound(format!("No job: {id}"))
    }

    pub(crate) fn duplicate_job(id: &str) -> Self {
        Self::Conflict(format!("Duplicate job: {id}"))
    }
}
