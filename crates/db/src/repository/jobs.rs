//! Job CRUD operations.
//!
//! Each function issues exactly one statement.  Statements with a dynamic
//! shape (partial update, filtered listing) are built by the pure
//! `*_statement` functions so their placeholder numbering can be checked
//! without a database.

use std::collections::HashMap;

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::{
    DbError,
    models::{FieldValue, JobFilter, JobRow, JobUpdate, NewJob},
    sql::{sql_for_partial_update, PartialUpdate},
};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

type JobQuery<'q> = QueryAs<'q, Postgres, JobRow, PgArguments>;

/// Bind `values` to `query` in order, one per placeholder.
fn bind_values(mut query: JobQuery<'_>, values: Vec<FieldValue>) -> JobQuery<'_> {
    for value in values {
        query = match value {
            FieldValue::Text(v) => query.bind(v),
            FieldValue::Int(v) => query.bind(v),
            FieldValue::Float(v) => query.bind(v),
        };
    }
    query
}

/// Compile a job update into its `SET` fragment, renaming `companyHandle`.
pub fn compile_job_update(update: JobUpdate) -> Result<PartialUpdate<FieldValue>, DbError> {
    let aliases: HashMap<&str, &str> = HashMap::from(JobUpdate::ALIASES);
    sql_for_partial_update(update.into_fields()?, &aliases)
}

/// Build the `UPDATE` statement for `id` and its full parameter list.
///
/// The id is always the last parameter, numbered right after the `SET`
/// values.
pub fn update_statement(id: &str, update: JobUpdate) -> Result<(String, Vec<FieldValue>), DbError> {
    let compiled = compile_job_update(update)?;
    let sql = format!(
        "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
        compiled.set_cols,
        compiled.next_placeholder(),
    );
    Ok((sql, compiled.into_params([FieldValue::from(id)])))
}

/// Escape `\`, `%` and `_` so `text` matches literally inside a LIKE pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the `SELECT` statement for a filtered listing and its parameters.
///
/// Titles sort with the "C" collation (byte order), independent of the
/// database's default collation.
pub fn list_statement(filter: &JobFilter) -> (String, Vec<FieldValue>) {
    let mut where_parts = Vec::new();
    let mut params = Vec::new();

    if let Some(title) = &filter.title {
        params.push(FieldValue::from(format!("%{}%", escape_like(title))));
        where_parts.push(format!("title ILIKE ${} ESCAPE '\\'", params.len()));
    }

    if let Some(min_salary) = filter.min_salary {
        params.push(FieldValue::from(min_salary));
        where_parts.push(format!("salary >= ${}", params.len()));
    }

    if filter.has_equity == Some(true) {
        where_parts.push("equity > 0".to_string());
    }

    let mut sql = format!("SELECT {JOB_COLUMNS} FROM jobs");
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    sql.push_str(" ORDER BY title COLLATE \"C\", id");

    (sql, params)
}

/// Insert a new job.
///
/// Returns [`DbError::Conflict`] when a job with the same id exists; the
/// primary key decides, so concurrent creates cannot both succeed.
pub async fn create_job(pool: &PgPool, job: NewJob) -> Result<JobRow, DbError> {
    debug!(id = %job.id, "creating job");

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (id, title, salary, equity, company_handle)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, salary, equity, company_handle
        "#,
    )
    .bind(&job.id)
    .bind(&job.title)
    .bind(job.salary)
    .bind(job.equity)
    .bind(&job.company_handle)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::duplicate_job(&job.id),
        other => DbError::Sqlx(other),
    })?;

    Ok(row)
}

/// Fetch a single job by id.
pub async fn get_job(pool: &PgPool, id: &str) -> Result<JobRow, DbError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"SELECT id, title, salary, equity, company_handle FROM jobs WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::job_not_found(id))?;

    Ok(row)
}

/// Return all jobs matching `filter`, ordered by title.
pub async fn list_jobs(pool: &PgPool, filter: &JobFilter) -> Result<Vec<JobRow>, DbError> {
    let (sql, params) = list_statement(filter);
    debug!(%sql, "listing jobs");

    let rows = bind_values(sqlx::query_as::<_, JobRow>(&sql), params)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Apply a partial update to the job `id` and return the updated row.
///
/// An empty update fails with [`DbError::InvalidRequest`] before anything
/// is sent to the database.
pub async fn update_job(pool: &PgPool, id: &str, update: JobUpdate) -> Result<JobRow, DbError> {
    let (sql, params) = update_statement(id, update)?;
    debug!(%sql, params = params.len(), "updating job");

    let row = bind_values(sqlx::query_as::<_, JobRow>(&sql), params)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::job_not_found(id))?;

    Ok(row)
}

/// Permanently delete a job.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_job(pool: &PgPool, id: &str) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::job_not_found(id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_statement_puts_id_after_set_values() {
        let update = JobUpdate {
            title: Some(Some("New".into())),
            salary: Some(Some(100000)),
            ..Default::default()
        };

        let (sql, params) = update_statement("j1", update).unwrap();

        assert_eq!(
            sql,
            r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3 RETURNING id, title, salary, equity, company_handle"#
        );
        assert_eq!(
            params,
            vec![FieldValue::from("New"), FieldValue::from(100000), FieldValue::from("j1")]
        );
    }

    #[test]
    fn update_statement_renames_company_handle() {
        let update = JobUpdate {
            company_handle: Some(Some("c2".into())),
            ..Default::default()
        };

        let (sql, params) = update_statement("j1", update).unwrap();

        assert!(sql.contains(r#"SET "company_handle"=$1 WHERE id = $2"#));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn update_statement_can_clear_nullable_columns() {
        let update = JobUpdate {
            equity: Some(None),
            ..Default::default()
        };

        let (sql, params) = update_statement("j1", update).unwrap();

        assert!(sql.contains(r#"SET "equity"=$1 WHERE id = $2"#));
        assert_eq!(params[0], FieldValue::Float(None));
    }

    #[test]
    fn empty_update_builds_no_statement() {
        let err = update_statement("j1", JobUpdate::default()).unwrap_err();
        assert!(matches!(err, DbError::InvalidRequest(_)));
    }

    #[test]
    fn list_statement_without_filters() {
        let (sql, params) = list_statement(&JobFilter::default());

        assert_eq!(
            sql,
            r#"SELECT id, title, salary, equity, company_handle FROM jobs ORDER BY title COLLATE "C", id"#
        );
        assert!(params.is_empty());
    }

    #[test]
    fn list_statement_numbers_filters_in_order() {
        let filter = JobFilter {
            title: Some("eng".into()),
            min_salary: Some(20000),
            has_equity: Some(true),
        };

        let (sql, params) = list_statement(&filter);

        assert!(sql.ends_with(
            r#"WHERE title ILIKE $1 ESCAPE '\' AND salary >= $2 AND equity > 0 ORDER BY title COLLATE "C", id"#
        ));
        assert_eq!(params, vec![FieldValue::from("%eng%"), FieldValue::from(20000)]);
    }

    #[test]
    fn list_statement_min_salary_only_starts_at_one() {
        let filter = JobFilter {
            min_salary: Some(15000),
            has_equity: Some(false),
            ..Default::default()
        };

        let (sql, params) = list_statement(&filter);

        assert!(sql.contains("WHERE salary >= $1 ORDER BY"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn list_statement_escapes_like_wildcards() {
        let filter = JobFilter {
            title: Some(r"50%_off\".into()),
            ..Default::default()
        };

        let (sql, params) = list_statement(&filter);

        assert!(sql.contains(r"WHERE title ILIKE $1 ESCAPE '\'"));
        assert_eq!(params, vec![FieldValue::from(r"%50\%\_off\\%")]);
    }

    #[test]
    fn list_statement_underscore_is_literal() {
        let filter = JobFilter { title: Some("_".into()), ..Default::default() };

        let (_, params) = list_statement(&filter);

        assert_eq!(params, vec![FieldValue::from(r"%\_%")]);
    }
}
