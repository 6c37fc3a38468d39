//! Partial-update compiler.
//!
//! Turns an ordered mapping of logical field names to new values into the
//! `SET` clause of an `UPDATE` statement plus its positional parameters:
//!
//! ```text
//! {title: "New", companyHandle: "c2"}  +  {companyHandle: "company_handle"}
//!   => "title"=$1, "company_handle"=$2      ["New", "c2"]
//! ```
//!
//! Placeholder numbering follows the mapping's iteration order, which is why
//! the input is an [`IndexMap`] and not a `HashMap`.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::DbError;

/// Compiled `SET` fragment and the values bound to its placeholders.
///
/// `values[i]` is bound to `$<i+1>`.  The two halves are only ever handed out
/// together; any extra parameter the caller needs (e.g. the id in the
/// `WHERE` clause) goes after them, at [`PartialUpdate::next_placeholder`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate<V> {
    pub set_cols: String,
    pub values: Vec<V>,
    columns: Vec<String>,
}

impl<V> PartialUpdate<V> {
    /// Index of the first placeholder after the `SET` values.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Physical column names paired with their values, in placeholder order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &V)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Consumes the update, returning the values followed by `trailing`.
    pub fn into_params(self, trailing: impl IntoIterator<Item = V>) -> Vec<V> {
        let mut params = self.values;
        params.extend(trailing);
        params
    }
}

/// Compile `data` into a `SET` fragment.
///
/// Each key is renamed through `aliases` when it has a non-empty entry there;
/// otherwise the key itself is the column name.  Values are passed through
/// untouched, `NULL`s included.
///
/// # Errors
/// [`DbError::InvalidRequest`] if `data` is empty.
pub fn sql_for_partial_update<V>(
    data: IndexMap<String, V>,
    aliases: &HashMap<&str, &str>,
) -> Result<PartialUpdate<V>, DbError> {
    if data.is_empty() {
        return Err(DbError::InvalidRequest("No data".to_string()));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (key, value)) in data.into_iter().enumerate() {
        let column = match aliases.get(key.as_str()) {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => key,
        };
        cols.push(format!("\"{}\"=${}", column, idx + 1));
        columns.push(column);
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
        columns,
    })
}
