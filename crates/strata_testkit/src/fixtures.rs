//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use std::path::PathBuf;
use strata_core::{CriteriaMap, Database};
use strata_schema::{
    Affinity, ColumnDefinition, ConflictResolution, IndexDefinition, TableDefinition,
};
use tempfile::TempDir;

/// The entity name every test database registers its sample table under.
pub const TASK_ENTITY: &str = "Task";

/// The sample table definition used by test databases.
#[must_use]
pub fn task_table() -> TableDefinition {
    TableDefinition::new("task")
        .column(ColumnDefinition::new("itemID", Affinity::Integer).primary_key())
        .column(
            ColumnDefinition::new("title", Affinity::Text)
                .not_null()
                .with_sequence(1),
        )
        .column(ColumnDefinition::new("isComplete", Affinity::Boolean).with_sequence(2))
        .column(ColumnDefinition::new("dueDate", Affinity::DateTime).with_sequence(3))
}

/// An index on the sample table's completion flag.
#[must_use]
pub fn task_index() -> IndexDefinition {
    IndexDefinition::new("idx_task_complete", "task", ["isComplete"])
}

/// A test database with automatic cleanup.
///
/// The sample [`task_table`] schema is registered and created, so tests
/// can insert and select rows immediately.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        register_sample_schema(&db);
        Self {
            db,
            _temp_dir: None,
        }
    }

    /// Creates a new file-based test database.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::new(temp_dir.path().join("test.db"));
        db.open().expect("Failed to open file database");
        register_sample_schema(&db);
        Self {
            db,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database path if file-based, None if in-memory.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|dir| dir.path().join("test.db"))
    }

    /// Inserts `count` sample tasks, returning their row ids.
    pub fn seed_tasks(&self, count: usize) -> Vec<i64> {
        (0..count)
            .map(|index| {
                self.db
                    .insert(
                        &task_table(),
                        &CriteriaMap::new()
                            .with("title", format!("task {index}"))
                            .with("isComplete", index % 2 == 0),
                        ConflictResolution::default(),
                    )
                    .expect("Failed to insert task")
            })
            .collect()
    }
}

fn register_sample_schema(db: &Database) {
    db.registry().register_table(TASK_ENTITY, task_table());
    db.create_entity(TASK_ENTITY)
        .expect("Failed to create sample schema");
    db.create_index(&task_index())
        .expect("Failed to create sample index");
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use strata_testkit::with_test_db;
///
/// #[test]
/// fn my_test() {
///     with_test_db(|db| {
///         db.table_info("task").unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_test_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a test with a temporary file-based database.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &std::path::Path) -> R,
{
    let test_db = TestDatabase::file();
    let path = test_db.path().expect("File database should have a path");
    f(&test_db.db, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{CriteriaQuery, Projection};

    #[test]
    fn memory_database_has_the_sample_schema() {
        let test_db = TestDatabase::memory();
        let columns = test_db.table_info("task").unwrap();
        assert_eq!(columns.len(), 4);
        assert!(test_db.registry().contains(TASK_ENTITY));
    }

    #[test]
    fn file_database_is_backed_by_a_real_file() {
        with_file_db(|db, path| {
            assert!(path.exists());
            assert!(db.is_open());
        });
    }

    #[test]
    fn seeded_tasks_are_selectable() {
        let test_db = TestDatabase::memory();
        let ids = test_db.seed_tasks(5);
        assert_eq!(ids.len(), 5);

        let rows = test_db
            .select(TASK_ENTITY, Projection::Detail, &CriteriaQuery::new())
            .unwrap();
        assert_eq!(rows.len(), 5);
    }
}
