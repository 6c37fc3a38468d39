//! Row structs and request payloads for the `jobs` table.
//!
//! These are *persistence* models.  JSON field names are camelCase
//! (`companyHandle`), column names are snake_case (`company_handle`).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::DbError;

// ---------------------------------------------------------------------------
// jobs
// ---------------------------------------------------------------------------

/// A persisted job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

/// Payload for creating a job.  The identifier is chosen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl From<NewJob> for JobRow {
    fn from(job: NewJob) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company_handle: job.company_handle,
        }
    }
}

/// Partial update of a job.
///
/// A missing key leaves the column alone; an explicit `null` is kept as
/// `Some(None)`.  It clears `salary`/`equity` and is rejected for the
/// NOT NULL columns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub equity: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub company_handle: Option<Option<String>>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl JobUpdate {
    /// Logical field name → column name, for fields whose names differ.
    pub const ALIASES: [(&'static str, &'static str); 1] = [("companyHandle", "company_handle")];

    /// The fields present in this update, keyed by their logical (JSON) name,
    /// in declaration order.
    ///
    /// # Errors
    /// [`DbError::InvalidRequest`] if `title` or `companyHandle` is `null`.
    pub fn into_fields(self) -> Result<IndexMap<String, FieldValue>, DbError> {
        let mut fields = IndexMap::new();
        if let Some(title) = self.title {
            let title = title.ok_or_else(|| not_nullable("title"))?;
            fields.insert("title".to_string(), FieldValue::Text(Some(title)));
        }
        if let Some(salary) = self.salary {
            fields.insert("salary".to_string(), FieldValue::Int(salary));
        }
        if let Some(equity) = self.equity {
            fields.insert("equity".to_string(), FieldValue::Float(equity));
        }
        if let Some(handle) = self.company_handle {
            let handle = handle.ok_or_else(|| not_nullable("companyHandle"))?;
            fields.insert("companyHandle".to_string(), FieldValue::Text(Some(handle)));
        }
        Ok(fields)
    }
}

fn not_nullable(field: &str) -> DbError {
    DbError::InvalidRequest(format!("{field} cannot be null"))
}

/// Optional search filters for listing jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    /// `true` keeps only jobs with a non-zero equity; `false` is no filter.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    /// Whether `job` passes every filter that is set.
    pub fn matches(&self, job: &JobRow) -> bool {
        if let Some(title) = &self.title {
            if !job.title.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if !job.salary.is_some_and(|s| s >= min) {
                return false;
            }
        }
        if self.has_equity == Some(true) && !job.equity.is_some_and(|e| e > 0.0) {
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// bound values
// ---------------------------------------------------------------------------

/// A scalar bound to a positional placeholder.
///
/// `None` is SQL `NULL`; the variant still records the column type so the
/// driver can send a typed parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Int(Option<i32>),
    Float(Option<f64>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        match self {
            Self::Text(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(Some(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_distinguishes_null_from_missing() {
        let update: JobUpdate = serde_json::from_value(json!({ "salary": null })).unwrap();
        assert_eq!(update.salary, Some(None));
        assert_eq!(update.equity, None);

        let fields = update.into_fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["salary"], FieldValue::Int(None));
    }

    #[test]
    fn update_fields_use_logical_names_in_declaration_order() {
        let update: JobUpdate = serde_json::from_value(json!({
            "companyHandle": "c2",
            "equity": 0.5,
            "title": "New",
        }))
        .unwrap();

        let keys: Vec<_> = update.into_fields().unwrap().into_keys().collect();
        assert_eq!(keys, vec!["title", "equity", "companyHandle"]);
    }

    #[test]
    fn explicit_null_title_is_kept_and_rejected() {
        let update: JobUpdate = serde_json::from_value(json!({ "title": null })).unwrap();
        assert_eq!(update.title, Some(None));

        let err = update.into_fields().unwrap_err();
        assert!(matches!(err, DbError::InvalidRequest(msg) if msg == "title cannot be null"));
    }

    #[test]
    fn explicit_null_title_alongside_other_fields_is_rejected() {
        let update: JobUpdate =
            serde_json::from_value(json!({ "title": null, "salary": 5 })).unwrap();

        assert!(matches!(update.into_fields(), Err(DbError::InvalidRequest(_))));
    }

    #[test]
    fn explicit_null_company_handle_is_rejected() {
        let update: JobUpdate =
            serde_json::from_value(json!({ "companyHandle": null })).unwrap();

        let err = update.into_fields().unwrap_err();
        assert!(matches!(err, DbError::InvalidRequest(msg) if msg == "companyHandle cannot be null"));
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let res = serde_json::from_value::<JobUpdate>(json!({ "id": "j9" }));
        assert!(res.is_err());
    }

    #[test]
    fn row_serializes_with_camel_case_keys() {
        let row = JobRow {
            id: "j1".into(),
            title: "t1".into(),
            salary: Some(10000),
            equity: None,
            company_handle: "c1".into(),
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "id": "j1", "title": "t1", "salary": 10000, "equity": null, "companyHandle": "c1" })
        );
    }

    #[test]
    fn filter_matches_title_case_insensitively() {
        let row = JobRow {
            id: "j1".into(),
            title: "Senior Engineer".into(),
            salary: Some(50000),
            equity: Some(0.0),
            company_handle: "c1".into(),
        };
        let filter = JobFilter { title: Some("engin".into()), ..Default::default() };
        assert!(filter.matches(&row));

        let filter = JobFilter { has_equity: Some(true), ..Default::default() };
        assert!(!filter.matches(&row));

        let filter = JobFilter { has_equity: Some(false), min_salary: Some(50000), ..Default::default() };
        assert!(filter.matches(&row));
    }
}
