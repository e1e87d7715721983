//! Result containers returned by statement execution.

use std::collections::BTreeMap;
use strata_codec::Value;

/// One decoded result row.
///
/// Columns keep the order of the statement's select list; `get` looks a
/// column up by the name (or property alias) it was selected under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column value. Order of calls fixes column order.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    /// Looks a value up by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Looks a value up by position.
    #[must_use]
    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|(_, value)| value)
    }

    /// Column names in statement order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(name, value)` pairs in statement order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The outcome of one executed statement.
///
/// Detached from the engine entirely: the statement text is retained for
/// diagnostics, rows are fully decoded, and every stage failure (prepare,
/// bind, step, finalize) that occurred is kept in `errors` under its
/// SQLite result code. A result with a non-empty error map exposes no
/// rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseResult {
    statement: String,
    rows: Vec<Row>,
    result_code: i32,
    result_message: String,
    extended_code: i32,
    extended_message: String,
    errors: BTreeMap<i32, String>,
}

impl DatabaseResult {
    pub(crate) fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            ..Self::default()
        }
    }

    pub(crate) fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub(crate) fn set_codes(&mut self, primary: i32, message: impl Into<String>) {
        self.result_code = primary;
        self.result_message = message.into();
    }

    pub(crate) fn set_extended(&mut self, extended: i32, message: impl Into<String>) {
        self.extended_code = extended;
        self.extended_message = message.into();
    }

    pub(crate) fn record_error(&mut self, code: i32, message: impl Into<String>) {
        self.errors.insert(code, message.into());
    }

    pub(crate) fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// The executed statement text. Diagnostics only.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The decoded rows. Empty when any stage failed.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the result, yielding its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// The primary SQLite result code of the final stage.
    #[must_use]
    pub fn result_code(&self) -> i32 {
        self.result_code
    }

    /// The message accompanying the primary result code.
    #[must_use]
    pub fn result_message(&self) -> &str {
        &self.result_message
    }

    /// The extended SQLite result code, when the engine supplied one.
    #[must_use]
    pub fn extended_code(&self) -> i32 {
        self.extended_code
    }

    /// The message accompanying the extended result code.
    #[must_use]
    pub fn extended_message(&self) -> &str {
        &self.extended_message
    }

    /// All stage failures, keyed by SQLite result code.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<i32, String> {
        &self.errors
    }

    /// Whether execution completed without any stage failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_preserve_statement_column_order() {
        let mut row = Row::new();
        row.push("itemID", Value::Integer(1));
        row.push("name", Value::Text("Ada".to_string()));

        assert_eq!(row.column_names().collect::<Vec<_>>(), ["itemID", "name"]);
        assert_eq!(row.get("name"), Some(&Value::Text("Ada".to_string())));
        assert_eq!(row.get_at(0), Some(&Value::Integer(1)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn failed_result_retains_errors_and_no_rows() {
        let mut result = DatabaseResult::new("SELECT 1");
        let mut row = Row::new();
        row.push("1", Value::Integer(1));
        result.push_row(row);
        result.record_error(1, "SQL logic error".to_string());
        result.clear_rows();

        assert!(!result.is_success());
        assert!(result.rows().is_empty());
        assert_eq!(result.errors().get(&1).map(String::as_str), Some("SQL logic error"));
        assert_eq!(result.statement(), "SELECT 1");
    }
}
