//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, the partial-update
//! compiler and repository functions for the `jobs` table.  No HTTP concerns
//! live here.

pub mod error;
pub mod pool;
pub mod models;
pub mod sql;
pub mod repository;

pub use pool::DbPool;
pub use error::DbError;
pub use models::{FieldValue, JobFilter, JobRow, JobUpdate, NewJob};
pub use repository::{InMemoryJobStore, JobStore, PgJobStore};
