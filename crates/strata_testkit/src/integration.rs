//! Cross-crate integration test helpers.
//!
//! Provides a harness that tracks what it writes so tests can assert the
//! database agrees, plus end-to-end coverage of the access layer's
//! contract: bind ordering, typed round-trips, attachment, rollback, and
//! structural schema rejection.

use crate::fixtures::{task_table, TestDatabase, TASK_ENTITY};
use strata_codec::Value;
use strata_core::{ConflictResolution, CriteriaMap, CriteriaQuery, Projection, Row};

/// A test harness that mirrors every insert it performs.
pub struct IntegrationHarness {
    /// The database under test.
    pub db: TestDatabase,
    tracked: Vec<(i64, String, bool)>,
}

impl IntegrationHarness {
    /// Creates a new harness over an in-memory database.
    pub fn new() -> Self {
        Self {
            db: TestDatabase::memory(),
            tracked: Vec::new(),
        }
    }

    /// Inserts a task and tracks it for later verification.
    pub fn put(&mut self, title: &str, complete: bool) -> i64 {
        let id = self
            .db
            .insert(
                &task_table(),
                &CriteriaMap::new()
                    .with("title", title)
                    .with("isComplete", complete),
                ConflictResolution::default(),
            )
            .expect("Failed to insert task");
        self.tracked.push((id, title.to_string(), complete));
        id
    }

    /// Deletes a task and updates tracking.
    pub fn delete(&mut self, id: i64) {
        let deleted = self
            .db
            .delete(
                &task_table(),
                &CriteriaQuery::new().group(CriteriaMap::new().with("itemID", id)),
            )
            .expect("Failed to delete task");
        assert_eq!(deleted, 1, "Expected to delete exactly one row");
        self.tracked.retain(|(tracked_id, _, _)| *tracked_id != id);
    }

    /// Verifies every tracked task is in the database, unchanged.
    pub fn verify_all(&self) {
        let rows = self
            .db
            .select(TASK_ENTITY, Projection::Detail, &CriteriaQuery::new())
            .expect("Failed to select tasks");
        assert_eq!(rows.len(), self.tracked.len(), "Row count mismatch");

        for (id, title, complete) in &self.tracked {
            let row = find_by_id(&rows, *id)
                .unwrap_or_else(|| panic!("Tracked row {id} missing from the database"));
            assert_eq!(row.get("title"), Some(&Value::Text(title.clone())));
            assert_eq!(row.get("isComplete"), Some(&Value::Bool(*complete)));
        }
    }

    /// Returns the count of tracked tasks.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn find_by_id(rows: &[Row], id: i64) -> Option<&Row> {
    rows.iter()
        .find(|row| row.get("itemID") == Some(&Value::Integer(id)))
}
