//! Result-row representation and column namespacing.
//!
//! A join-aware select aliases every output column as
//! `<table>__<column>`, so a single flat row can carry fields from several
//! tables without collisions. [`namespaced_key`] builds those keys; the
//! mapper uses the same helper for aliasing and for extraction, so the two
//! cannot drift apart.

use relmap_core::{RelmapError, RelmapResult};

use crate::value::{FromValue, Value};

const NAMESPACE_SEPARATOR: &str = "__";

/// Builds the namespaced key for a column of a table.
///
/// # Examples
///
/// ```
/// use relmap_db::row::namespaced_key;
///
/// assert_eq!(namespaced_key("users", "id"), "users__id");
/// ```
pub fn namespaced_key(table: &str, column: &str) -> String {
    format!("{table}{NAMESPACE_SEPARATOR}{column}")
}

/// A generic database row for passing data from an adapter into the mapper.
///
/// `Row` holds a list of column names and their corresponding values, and
/// provides typed access via [`get`](Row::get).
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row from column names and values.
    ///
    /// # Panics
    ///
    /// Panics if the number of columns does not match the number of values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "Row column count must match value count"
        );
        Self { columns, values }
    }

    /// Creates a row from `(column, value)` pairs.
    pub fn from_pairs(pairs: Vec<(&str, Value)>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .unzip();
        Self { columns, values }
    }

    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `true` if the row carries the given column.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Gets a typed value by column name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or the value cannot be
    /// converted to the requested type.
    pub fn get<T: FromValue>(&self, column: &str) -> RelmapResult<T> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| {
                RelmapError::Database(format!("Column '{column}' not found in row"))
            })?;
        T::from_value(&self.values[idx])
    }

    /// Returns a reference to the raw value at the given column name.
    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced_key("users", "id"), "users__id");
        assert_eq!(namespaced_key("products", "created_at"), "products__created_at");
    }

    #[test]
    fn test_row_new_and_access() {
        let row = Row::new(
            vec!["users__id".to_string(), "users__email".to_string()],
            vec![Value::Int(1), Value::String("a@b.com".into())],
        );
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
        assert!(row.contains("users__id"));
        assert_eq!(row.get::<i64>("users__id").unwrap(), 1);
        assert_eq!(row.get::<String>("users__email").unwrap(), "a@b.com");
    }

    #[test]
    fn test_row_missing_column() {
        let row = Row::from_pairs(vec![("users__id", Value::Int(1))]);
        assert!(row.get::<i64>("users__age").is_err());
        assert_eq!(row.get_value("users__age"), None);
    }

    #[test]
    fn test_row_get_value() {
        let row = Row::from_pairs(vec![("users__id", Value::Int(1))]);
        assert_eq!(row.get_value("users__id"), Some(&Value::Int(1)));
    }

    #[test]
    #[should_panic(expected = "Row column count must match value count")]
    fn test_row_mismatched_lengths_panics() {
        let _ = Row::new(vec!["a".to_string()], vec![]);
    }
}
