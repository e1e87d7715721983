//! Engine introspection: PRAGMA wrappers and maintenance commands.

use crate::connection::{alias_is_valid, run_statement, Database};
use crate::error::{CoreError, CoreResult};
use crate::result::Row;
use serde::Serialize;
use std::collections::HashMap;
use strata_codec::Value;
use tracing::debug;

/// One attached database, as reported by `PRAGMA database_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseItem {
    /// Position in the attach order; 0 is the primary database.
    pub seq: i64,
    /// The schema alias (`main`, `temp`, or the attach alias).
    pub name: String,
    /// The backing file path; empty for in-memory databases.
    pub file: String,
}

/// One column, as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnItem {
    /// Column position in the table.
    pub cid: i64,
    /// Column name.
    pub name: String,
    /// Declared type text, as written in the DDL.
    pub column_type: String,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
    /// The default literal, when one is declared.
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// One violation, as reported by `PRAGMA foreign_key_check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyCheckItem {
    /// The table holding the violating row.
    pub table: String,
    /// The violating rowid; absent for `WITHOUT ROWID` tables.
    pub rowid: Option<i64>,
    /// The table the broken reference points at.
    pub parent: String,
    /// Index of the violated foreign-key constraint within its table.
    pub fkid: i64,
}

impl Database {
    /// Lists the attached databases in attach order.
    pub fn database_list(&self) -> CoreResult<Vec<DatabaseItem>> {
        let rows = self.statement_rows("PRAGMA database_list")?;
        Ok(rows
            .iter()
            .map(|row| DatabaseItem {
                seq: integer(row, "seq"),
                name: text(row, "name"),
                file: text(row, "file"),
            })
            .collect())
    }

    /// Describes the columns of `table` as the engine sees them.
    pub fn table_info(&self, table: &str) -> CoreResult<Vec<ColumnItem>> {
        let statement = format!("PRAGMA table_info('{}')", table.replace('\'', "''"));
        let rows = self.statement_rows(&statement)?;
        Ok(rows
            .iter()
            .map(|row| ColumnItem {
                cid: integer(row, "cid"),
                name: text(row, "name"),
                column_type: text(row, "type"),
                not_null: integer(row, "notnull") != 0,
                default_value: optional_text(row, "dflt_value"),
                primary_key: integer(row, "pk") != 0,
            })
            .collect())
    }

    /// Reports foreign-key violations.
    ///
    /// `schema` narrows the check to one attached database and `table` to
    /// one table; `None` for either means everything.
    pub fn foreign_key_check(
        &self,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> CoreResult<Vec<ForeignKeyCheckItem>> {
        let pragma = match checked_schema(schema)? {
            Some(schema) => format!("PRAGMA {schema}.foreign_key_check"),
            None => "PRAGMA foreign_key_check".to_string(),
        };
        let statement = match table {
            Some(table) => format!("{pragma}('{}')", table.replace('\'', "''")),
            None => pragma,
        };
        let rows = self.statement_rows(&statement)?;
        Ok(rows
            .iter()
            .map(|row| ForeignKeyCheckItem {
                table: text(row, "table"),
                rowid: optional_integer(row, "rowid"),
                parent: text(row, "parent"),
                fkid: integer(row, "fkid"),
            })
            .collect())
    }

    /// Runs the engine's integrity check, returning the reported problems.
    ///
    /// `schema` narrows the check to one attached database. `max_rows`
    /// caps how many problems the engine reports; 0 means the default cap
    /// of 100. A healthy database returns an empty list.
    pub fn integrity_check(&self, schema: Option<&str>, max_rows: usize) -> CoreResult<Vec<String>> {
        let cap = if max_rows == 0 { 100 } else { max_rows };
        let statement = match checked_schema(schema)? {
            Some(schema) => format!("PRAGMA {schema}.integrity_check({cap})"),
            None => format!("PRAGMA integrity_check({cap})"),
        };
        let rows = self.statement_rows(&statement)?;
        let problems: Vec<String> = rows
            .iter()
            .map(|row| text(row, "integrity_check"))
            .filter(|line| line != "ok")
            .collect();
        Ok(problems)
    }

    /// Verifies the database: integrity check first, then foreign keys.
    ///
    /// Either class of problem is an error carrying the problem count.
    pub fn verify(&self) -> CoreResult<()> {
        let problems = self.integrity_check(None, 0)?;
        if !problems.is_empty() {
            return Err(CoreError::IntegrityViolation {
                count: problems.len(),
            });
        }
        let violations = self.foreign_key_check(None, None)?;
        if !violations.is_empty() {
            return Err(CoreError::ForeignKeyViolation {
                count: violations.len(),
            });
        }
        Ok(())
    }

    /// The engine's schema cookie, incremented on every DDL change.
    ///
    /// `schema` selects an attached database; `None` reads the primary one.
    pub fn schema_version(&self, schema: Option<&str>) -> CoreResult<i64> {
        let statement = match checked_schema(schema)? {
            Some(schema) => format!("PRAGMA {schema}.schema_version"),
            None => "PRAGMA schema_version".to_string(),
        };
        let rows = self.statement_rows(&statement)?;
        Ok(rows
            .first()
            .and_then(|row| row.get_at(0))
            .and_then(Value::as_integer)
            .unwrap_or(0))
    }

    /// Rebuilds a database file, reclaiming free pages.
    ///
    /// `schema` selects an attached database; `None` vacuums the primary one.
    pub fn vacuum(&self, schema: Option<&str>) -> CoreResult<()> {
        let statement = match checked_schema(schema)? {
            Some(schema) => format!("VACUUM {schema}"),
            None => "VACUUM".to_string(),
        };
        debug!(schema = schema.unwrap_or("main"), "vacuum");
        self.statement_rows(&statement)?;
        Ok(())
    }

    fn statement_rows(&self, statement: &str) -> CoreResult<Vec<Row>> {
        self.with_connection(|conn| {
            let result = run_statement(conn, statement, &[], &HashMap::new()).into_result()?;
            Ok(result.into_rows())
        })
    }
}

/// The linked SQLite library version.
#[must_use]
pub fn engine_version() -> &'static str {
    rusqlite::version()
}

fn checked_schema(schema: Option<&str>) -> CoreResult<Option<&str>> {
    match schema {
        Some(alias) if !alias_is_valid(alias) => Err(CoreError::misuse(format!(
            "schema alias '{alias}' is not a bare identifier"
        ))),
        other => Ok(other),
    }
}

fn text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::Text(s)) => s.clone(),
        Some(other) if !other.is_null() => other_to_text(other),
        _ => String::new(),
    }
}

fn optional_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column) {
        Some(Value::Text(s)) => Some(s.clone()),
        Some(value) if !value.is_null() => Some(other_to_text(value)),
        _ => None,
    }
}

fn other_to_text(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => x.to_string(),
        _ => String::new(),
    }
}

fn integer(row: &Row, column: &str) -> i64 {
    row.get(column).and_then(Value::as_integer).unwrap_or(0)
}

fn optional_integer(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(Value::as_integer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.apply_statements(
            &[
                "CREATE TABLE person (itemID INTEGER PRIMARY KEY, name TEXT NOT NULL, \
                 age INTEGER DEFAULT 0)",
                "CREATE TABLE pet (itemID INTEGER PRIMARY KEY, ownerID INTEGER, \
                 FOREIGN KEY (ownerID) REFERENCES person (itemID))",
            ],
            "fixture",
        )
        .unwrap();
        db
    }

    #[test]
    fn database_list_reports_main_first() {
        let db = seeded();
        let list = db.database_list().unwrap();
        assert_eq!(list[0].seq, 0);
        assert_eq!(list[0].name, "main");
        assert_eq!(list[0].file, "");
    }

    #[test]
    fn table_info_reflects_the_ddl() {
        let db = seeded();
        let columns = db.table_info("person").unwrap();
        assert_eq!(columns.len(), 3);

        let name = &columns[1];
        assert_eq!(name.name, "name");
        assert_eq!(name.column_type, "TEXT");
        assert!(name.not_null);
        assert!(!name.primary_key);
        assert_eq!(name.default_value, None);

        let age = &columns[2];
        assert_eq!(age.default_value.as_deref(), Some("0"));
        assert!(columns[0].primary_key);
    }

    #[test]
    fn table_info_of_missing_table_is_empty() {
        let db = seeded();
        assert!(db.table_info("nonexistent").unwrap().is_empty());
    }

    #[test]
    fn healthy_database_verifies() {
        let db = seeded();
        assert!(db.integrity_check(None, 0).unwrap().is_empty());
        assert!(db.foreign_key_check(None, None).unwrap().is_empty());
        db.verify().unwrap();
    }

    #[test]
    fn dangling_reference_fails_verification() {
        let db = seeded();
        // Foreign keys are enforced per connection; bypass them to plant
        // the violation.
        db.query("PRAGMA foreign_keys = OFF", &[]).unwrap();
        db.query(
            "INSERT INTO pet (itemID, ownerID) VALUES (1, 999)",
            &[],
        )
        .unwrap();

        let violations = db.foreign_key_check(None, None).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].table, "pet");
        assert_eq!(violations[0].parent, "person");

        // Narrowing to an unrelated table hides the violation.
        assert!(db.foreign_key_check(None, Some("person")).unwrap().is_empty());
        assert_eq!(db.foreign_key_check(Some("main"), Some("pet")).unwrap().len(), 1);

        assert_eq!(
            db.verify(),
            Err(CoreError::ForeignKeyViolation { count: 1 })
        );
    }

    #[test]
    fn schema_version_moves_with_ddl() {
        let db = seeded();
        let before = db.schema_version(None).unwrap();
        db.apply_statements(&["CREATE TABLE extra (a INTEGER)"], "more ddl")
            .unwrap();
        assert!(db.schema_version(None).unwrap() > before);
    }

    #[test]
    fn vacuum_runs_on_a_healthy_database() {
        let db = seeded();
        db.vacuum(None).unwrap();
        db.vacuum(Some("main")).unwrap();
    }

    #[test]
    fn hostile_schema_alias_is_rejected() {
        let db = seeded();
        assert!(matches!(
            db.integrity_check(Some("main; DROP TABLE person"), 0),
            Err(CoreError::Misuse { .. })
        ));
        assert!(matches!(
            db.vacuum(Some("x.y")),
            Err(CoreError::Misuse { .. })
        ));
    }

    #[test]
    fn engine_version_is_nonempty() {
        assert!(!engine_version().is_empty());
    }
}
