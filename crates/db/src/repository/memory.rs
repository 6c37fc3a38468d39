//! `InMemoryJobStore` — a test double for [`JobStore`].
//!
//! Mirrors the observable behaviour of the Postgres store: ids are unique,
//! listings are ordered by title, and updates go through the same
//! partial-update compiler, applied column by column.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{jobs::compile_job_update, JobStore};
use crate::{DbError, FieldValue, JobFilter, JobRow, JobUpdate, NewJob};

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    rows: Mutex<BTreeMap<String, JobRow>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`.
    pub fn with_rows(rows: impl IntoIterator<Item = JobRow>) -> Self {
        let rows = rows.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { rows: Mutex::new(rows) }
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    fn rows(&self) -> MutexGuard<'_, BTreeMap<String, JobRow>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write one compiled assignment onto `row`, by physical column name.
fn assign(row: &mut JobRow, column: &str, value: &FieldValue) -> Result<(), DbError> {
    match (column, value) {
        ("title", FieldValue::Text(Some(v))) => row.title = v.clone(),
        ("salary", FieldValue::Int(v)) => row.salary = *v,
        ("equity", FieldValue::Float(v)) => row.equity = *v,
        ("company_handle", FieldValue::Text(Some(v))) => row.company_handle = v.clone(),
        (column, value) => {
            return Err(DbError::InvalidRequest(format!(
                "cannot assign {value:?} to column {column}"
            )))
        }
    }
    Ok(())
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: NewJob) -> Result<JobRow, DbError> {
        let mut rows = self.rows();
        if rows.contains_key(&job.id) {
            return Err(DbError::duplicate_job(&job.id));
        }
        let row = JobRow::from(job);
        rows.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn get(&self, id: &str) -> Result<JobRow, DbError> {
        self.rows()
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::job_not_found(id))
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<JobRow>, DbError> {
        // Byte order on titles, same as `COLLATE "C"`.  BTreeMap yields id
        // order and the stable sort keeps it within a title.
        let mut jobs: Vec<JobRow> = self
            .rows()
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(jobs)
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<JobRow, DbError> {
        let compiled = compile_job_update(update)?;

        let mut rows = self.rows();
        let current = rows.get(id).ok_or_else(|| DbError::job_not_found(id))?;

        let mut updated = current.clone();
        for (column, value) in compiled.assignments() {
            assign(&mut updated, column, value)?;
        }
        rows.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), DbError> {
        self.rows()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DbError::job_not_found(id))
    }
}
