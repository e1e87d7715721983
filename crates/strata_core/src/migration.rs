//! Versioned schema migrations.
//!
//! Each migration contributes a batch of statements through a
//! [`MigrationContext`]; the manager applies pending batches in version
//! order, each as one transaction that also advances the engine's
//! `user_version` cookie. A database is up to date when its cookie equals
//! the highest registered version.

use crate::connection::Database;
use crate::error::{CoreError, CoreResult};
use strata_codec::Value;
use strata_schema::{IndexDefinition, TableDefinition, TriggerDefinition};
use tracing::{debug, info};

/// One versioned schema change.
pub trait Migration: Send + Sync {
    /// The version this migration brings the database to. Versions start
    /// at 1 and must be registered in strictly increasing order.
    fn version(&self) -> i64;

    /// A human-readable name, used in logs and failure reports.
    fn name(&self) -> &str;

    /// Queues the migration's statements.
    fn up(&self, context: &mut MigrationContext);
}

/// Collects the statements one migration wants to run.
#[derive(Debug, Default)]
pub struct MigrationContext {
    statements: Vec<String>,
}

impl MigrationContext {
    fn new() -> Self {
        Self::default()
    }

    /// Queues a raw statement.
    pub fn run(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Queues the `CREATE TABLE` for `definition`.
    pub fn create_table(&mut self, definition: &TableDefinition) {
        self.run(definition.create_table_sql());
    }

    /// Queues the `CREATE INDEX` for `index`.
    pub fn create_index(&mut self, index: &IndexDefinition) {
        self.run(index.create_sql());
    }

    /// Queues the `CREATE TRIGGER` for `trigger`.
    pub fn create_trigger(&mut self, trigger: &TriggerDefinition) {
        self.run(trigger.create_sql());
    }

    fn into_statements(self) -> Vec<String> {
        self.statements
    }
}

/// Registers migrations and applies the pending ones in order.
#[derive(Default)]
pub struct MigrationManager {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a migration.
    ///
    /// Versions must start at 1 or above and strictly increase across
    /// registrations; anything else is rejected immediately rather than
    /// surfacing as an out-of-order run later.
    pub fn register(&mut self, migration: impl Migration + 'static) -> CoreResult<()> {
        let version = migration.version();
        if version < 1 {
            return Err(CoreError::migration_failed(
                migration.name(),
                format!("version {version} is below 1"),
            ));
        }
        if version <= self.latest_version() {
            return Err(CoreError::migration_failed(
                migration.name(),
                format!(
                    "version {version} does not come after version {}",
                    self.latest_version()
                ),
            ));
        }
        self.migrations.push(Box::new(migration));
        Ok(())
    }

    /// The highest registered version, or 0 with no registrations.
    #[must_use]
    pub fn latest_version(&self) -> i64 {
        self.migrations
            .last()
            .map_or(0, |migration| migration.version())
    }

    /// Reads the database's current version cookie.
    pub fn current_version(&self, db: &Database) -> CoreResult<i64> {
        let result = db.query("PRAGMA user_version", &[])?;
        Ok(result
            .rows()
            .first()
            .and_then(|row| row.get_at(0))
            .and_then(Value::as_integer)
            .unwrap_or(0))
    }

    /// Names and versions of the migrations the database still needs.
    pub fn pending(&self, db: &Database) -> CoreResult<Vec<(i64, String)>> {
        let current = self.current_version(db)?;
        Ok(self
            .migrations
            .iter()
            .filter(|migration| migration.version() > current)
            .map(|migration| (migration.version(), migration.name().to_string()))
            .collect())
    }

    /// Applies every pending migration, returning how many ran.
    ///
    /// Each migration is one transaction; its statements and the
    /// `user_version` advance commit together or not at all. The first
    /// failure stops the run with the database left at the last version
    /// that committed.
    pub fn run_pending(&self, db: &Database) -> CoreResult<usize> {
        let current = self.current_version(db)?;
        let mut applied = 0;
        for migration in &self.migrations {
            if migration.version() <= current {
                continue;
            }
            let mut context = MigrationContext::new();
            migration.up(&mut context);
            let mut statements = context.into_statements();
            statements.push(format!("PRAGMA user_version = {}", migration.version()));

            debug!(
                name = migration.name(),
                version = migration.version(),
                statements = statements.len(),
                "applying migration"
            );
            db.apply_statements(&statements, migration.name())
                .map_err(|error| {
                    CoreError::migration_failed(migration.name(), error.to_string())
                })?;
            info!(
                name = migration.name(),
                version = migration.version(),
                "migration applied"
            );
            applied += 1;
        }
        Ok(applied)
    }
}

impl std::fmt::Debug for MigrationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let versions: Vec<i64> = self
            .migrations
            .iter()
            .map(|migration| migration.version())
            .collect();
        f.debug_struct("MigrationManager")
            .field("versions", &versions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_codec::Affinity;
    use strata_schema::ColumnDefinition;

    struct CreateLedger;

    impl Migration for CreateLedger {
        fn version(&self) -> i64 {
            1
        }

        fn name(&self) -> &str {
            "create ledger"
        }

        fn up(&self, context: &mut MigrationContext) {
            context.create_table(
                &TableDefinition::new("ledger")
                    .column(ColumnDefinition::new("itemID", Affinity::Integer).primary_key())
                    .column(ColumnDefinition::new("amount", Affinity::Real).with_sequence(1)),
            );
        }
    }

    struct AddMemo;

    impl Migration for AddMemo {
        fn version(&self) -> i64 {
            2
        }

        fn name(&self) -> &str {
            "add memo column"
        }

        fn up(&self, context: &mut MigrationContext) {
            context.run("ALTER TABLE ledger ADD COLUMN memo TEXT");
        }
    }

    struct Broken;

    impl Migration for Broken {
        fn version(&self) -> i64 {
            3
        }

        fn name(&self) -> &str {
            "broken"
        }

        fn up(&self, context: &mut MigrationContext) {
            context.run("ALTER TABLE ledger ADD COLUMN memo TEXT");
        }
    }

    fn manager() -> MigrationManager {
        let mut manager = MigrationManager::new();
        manager.register(CreateLedger).unwrap();
        manager.register(AddMemo).unwrap();
        manager
    }

    #[test]
    fn pending_migrations_apply_in_order_and_advance_the_cookie() {
        let db = Database::open_in_memory().unwrap();
        let manager = manager();

        assert_eq!(manager.pending(&db).unwrap().len(), 2);
        assert_eq!(manager.run_pending(&db).unwrap(), 2);
        assert_eq!(manager.current_version(&db).unwrap(), 2);

        let columns = db.table_info("ledger").unwrap();
        assert!(columns.iter().any(|column| column.name == "memo"));

        assert_eq!(manager.run_pending(&db).unwrap(), 0);
        assert!(manager.pending(&db).unwrap().is_empty());
    }

    #[test]
    fn versions_must_strictly_increase() {
        let mut manager = manager();
        assert!(matches!(
            manager.register(CreateLedger),
            Err(CoreError::MigrationFailed { .. })
        ));

        // Gaps are fine; only ordering is enforced.
        let mut fresh = MigrationManager::new();
        fresh.register(AddMemo).unwrap();
        assert_eq!(fresh.latest_version(), 2);
    }

    #[test]
    fn failed_migration_leaves_the_last_committed_version() {
        let db = Database::open_in_memory().unwrap();
        let mut manager = manager();
        // Version 3 re-adds an existing column, which the engine rejects.
        manager.register(Broken).unwrap();

        let error = manager.run_pending(&db).unwrap_err();
        assert!(matches!(
            error,
            CoreError::MigrationFailed { ref name, .. } if name == "broken"
        ));
        assert_eq!(manager.current_version(&db).unwrap(), 2);
    }
}
