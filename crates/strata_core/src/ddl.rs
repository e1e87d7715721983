//! Schema-changing operations and table-to-table data migration.

use crate::connection::{column_affinity, run_statement, Database};
use crate::error::{CoreError, CoreResult};
use crate::events::DatabaseEvent;
use std::collections::HashMap;
use strata_codec::{encode, Primitive, Value};
use strata_schema::{ColumnDefinition, IndexDefinition, TableDefinition, TriggerDefinition};
use tracing::debug;

impl Database {
    /// Creates the table described by `definition`.
    ///
    /// The definition is validated structurally before any SQL reaches
    /// the engine.
    pub fn create_table(&self, definition: &TableDefinition) -> CoreResult<()> {
        definition.validate()?;
        self.execute_ddl(&definition.create_table_sql())
    }

    /// Creates everything a registered entity ships with: its table, then
    /// its indexes, then its triggers, as one transaction.
    pub fn create_entity(&self, entity: &str) -> CoreResult<()> {
        let schema = self.registry().schema(entity)?;
        self.apply_statements(&schema.create_statements(), entity)
    }

    /// Drops `table`.
    pub fn drop_table(&self, table: &str) -> CoreResult<()> {
        self.execute_ddl(&format!("DROP TABLE {table}"))
    }

    /// Renames `table` to `new_name`.
    pub fn rename_table(&self, table: &str, new_name: &str) -> CoreResult<()> {
        self.execute_ddl(&format!("ALTER TABLE {table} RENAME TO {new_name}"))
    }

    /// Renames a column of `table`.
    pub fn rename_column(&self, table: &str, column: &str, new_name: &str) -> CoreResult<()> {
        self.execute_ddl(&format!(
            "ALTER TABLE {table} RENAME COLUMN {column} TO {new_name}"
        ))
    }

    /// Adds a column to `table`.
    ///
    /// The virtual discriminator column has no DDL form and is rejected
    /// as misuse.
    pub fn add_column(&self, table: &str, column: &ColumnDefinition) -> CoreResult<()> {
        let fragment = column
            .create_fragment()
            .ok_or_else(|| CoreError::misuse("the virtual class column has no DDL form"))?;
        self.execute_ddl(&format!("ALTER TABLE {table} ADD COLUMN {fragment}"))
    }

    /// Creates `index`.
    pub fn create_index(&self, index: &IndexDefinition) -> CoreResult<()> {
        self.execute_ddl(&index.create_sql())
    }

    /// Drops the index named `name`.
    pub fn drop_index(&self, name: &str) -> CoreResult<()> {
        self.execute_ddl(&format!("DROP INDEX {name}"))
    }

    /// Creates `trigger`.
    pub fn create_trigger(&self, trigger: &TriggerDefinition) -> CoreResult<()> {
        self.execute_ddl(&trigger.create_sql())
    }

    /// Drops the trigger named `name`.
    pub fn drop_trigger(&self, name: &str) -> CoreResult<()> {
        self.execute_ddl(&format!("DROP TRIGGER {name}"))
    }

    /// Copies rows from the migration's source table into its destination
    /// table, as one transaction.
    ///
    /// [`DatabaseEvent::MigrationBegan`] is emitted before the copy and
    /// [`DatabaseEvent::MigrationFinished`] after it, whether the copy
    /// committed or rolled back. A committed copy also emits
    /// [`DatabaseEvent::DataChanged`].
    pub fn migrate_data(&self, migration: &DataMigration) -> CoreResult<()> {
        let statement = migration.insert_select_sql()?;
        debug!(migration = migration.name(), "data migration starting");
        self.emit(DatabaseEvent::MigrationBegan);
        let outcome = self.transact(migration.name(), |conn| {
            run_statement(conn, &statement, &[], &HashMap::new()).into_result()?;
            Ok(())
        });
        self.emit(DatabaseEvent::MigrationFinished);
        if outcome.is_ok() {
            self.emit(DatabaseEvent::DataChanged);
        }
        outcome
    }

    fn execute_ddl(&self, statement: &str) -> CoreResult<()> {
        self.with_connection(|conn| {
            run_statement(conn, statement, &[], &HashMap::new()).into_result()?;
            Ok(())
        })
    }
}

/// A column-mapped copy from one table into another.
///
/// `map` pairs a destination column with the source column it reads;
/// `supply` gives a destination column a fixed value instead. The copy
/// renders as a single `INSERT INTO … SELECT … FROM …` statement, fixed
/// values inlined as literals.
#[derive(Debug, Clone, PartialEq)]
pub struct DataMigration {
    name: String,
    source: TableDefinition,
    destination: TableDefinition,
    columns: Vec<(String, String)>,
    overrides: Vec<(String, Value)>,
}

impl DataMigration {
    /// Creates a migration named `name` from `source` into `destination`.
    pub fn new(
        name: impl Into<String>,
        source: TableDefinition,
        destination: TableDefinition,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            destination,
            columns: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Maps a destination column onto a source column.
    #[must_use]
    pub fn map(mut self, destination: impl Into<String>, source: impl Into<String>) -> Self {
        self.columns.push((destination.into(), source.into()));
        self
    }

    /// Supplies a destination column with a fixed value.
    #[must_use]
    pub fn supply(mut self, destination: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push((destination.into(), value.into()));
        self
    }

    /// The migration name, used as the transaction identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the `INSERT INTO … SELECT` statement for this migration.
    pub fn insert_select_sql(&self) -> CoreResult<String> {
        if self.columns.is_empty() && self.overrides.is_empty() {
            return Err(CoreError::misuse(
                "a data migration needs at least one mapped or supplied column",
            ));
        }

        let total = self.columns.len() + self.overrides.len();
        let mut destinations = Vec::with_capacity(total);
        let mut selections = Vec::with_capacity(total);
        for (destination, source) in &self.columns {
            destinations.push(destination.clone());
            selections.push(source.clone());
        }
        for (destination, value) in &self.overrides {
            let affinity = column_affinity(&self.destination, destination)
                .unwrap_or_else(|| value.natural_affinity());
            let primitive = encode(value, affinity, destination)?;
            destinations.push(destination.clone());
            selections.push(sql_literal(&primitive));
        }

        Ok(format!(
            "INSERT INTO {} ({}) SELECT {} FROM {}",
            self.destination.qualified_name(),
            destinations.join(", "),
            selections.join(", "),
            self.source.qualified_name()
        ))
    }
}

/// Renders a primitive as a SQL literal.
fn sql_literal(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Null => "NULL".to_string(),
        Primitive::Integer(n) => n.to_string(),
        Primitive::Real(x) => x.to_string(),
        Primitive::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Primitive::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2);
            for byte in bytes {
                hex.push_str(&format!("{byte:02X}"));
            }
            format!("X'{hex}'")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaQuery;
    use crate::registry::EntitySchema;
    use strata_codec::Affinity;
    use strata_schema::Projection;

    fn ledger() -> TableDefinition {
        TableDefinition::new("ledger")
            .column(
                ColumnDefinition::new("itemID", Affinity::Integer)
                    .primary_key()
                    .autoincrement(),
            )
            .column(ColumnDefinition::new("amount", Affinity::Real).with_sequence(1))
    }

    #[test]
    fn create_entity_builds_table_and_indexes() {
        let db = Database::open_in_memory().unwrap();
        db.registry().register("Ledger", || {
            EntitySchema::new(ledger())
                .with_index(IndexDefinition::new("ix_ledger_amount", "ledger", ["amount"]))
        });

        db.create_entity("Ledger").unwrap();
        assert_eq!(db.table_info("ledger").unwrap().len(), 2);

        db.drop_index("ix_ledger_amount").unwrap();
        db.drop_table("ledger").unwrap();
        assert!(db.table_info("ledger").unwrap().is_empty());
    }

    #[test]
    fn alter_operations_reshape_the_table() {
        let db = Database::open_in_memory().unwrap();
        db.create_table(&ledger()).unwrap();

        db.add_column("ledger", &ColumnDefinition::new("note", Affinity::Text))
            .unwrap();
        db.rename_column("ledger", "note", "memo").unwrap();
        db.rename_table("ledger", "journal").unwrap();

        let columns = db.table_info("journal").unwrap();
        assert!(columns.iter().any(|column| column.name == "memo"));
        assert!(db.table_info("ledger").unwrap().is_empty());
    }

    #[test]
    fn virtual_column_cannot_be_added() {
        let db = Database::open_in_memory().unwrap();
        db.create_table(&ledger()).unwrap();
        assert!(matches!(
            db.add_column("ledger", &ColumnDefinition::virtual_class("Ledger")),
            Err(CoreError::Misuse { .. })
        ));
    }

    #[test]
    fn invalid_definition_never_reaches_the_engine() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.create_table(&TableDefinition::new("empty")),
            Err(CoreError::Schema(_))
        ));
    }

    fn migration_fixture(db: &Database) -> (TableDefinition, TableDefinition) {
        let source = TableDefinition::new("task_v1")
            .column(ColumnDefinition::new("itemID", Affinity::Integer).primary_key())
            .column(ColumnDefinition::new("label", Affinity::Text).with_sequence(1));
        let destination = TableDefinition::new("task_v2")
            .column(ColumnDefinition::new("itemID", Affinity::Integer).primary_key())
            .column(ColumnDefinition::new("title", Affinity::Text).with_sequence(1))
            .column(ColumnDefinition::new("isComplete", Affinity::Boolean).with_sequence(2));
        db.create_table(&source).unwrap();
        db.create_table(&destination).unwrap();
        (source, destination)
    }

    #[test]
    fn migrate_data_maps_and_supplies_columns() {
        let db = Database::open_in_memory().unwrap();
        let (source, destination) = migration_fixture(&db);
        db.query(
            "INSERT INTO task_v1 (itemID, label) VALUES (1, 'first'), (2, 'second')",
            &[],
        )
        .unwrap();

        let rx = db.events().subscribe();
        let migration = DataMigration::new("task v1 to v2", source, destination.clone())
            .map("itemID", "itemID")
            .map("title", "label")
            .supply("isComplete", false);
        db.migrate_data(&migration).unwrap();

        assert_eq!(rx.recv().unwrap(), DatabaseEvent::MigrationBegan);
        assert_eq!(rx.recv().unwrap(), DatabaseEvent::MigrationFinished);
        assert_eq!(rx.recv().unwrap(), DatabaseEvent::DataChanged);

        let rows = db
            .select_from(&destination, Projection::Detail, &CriteriaQuery::new())
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some(&Value::Text("first".to_string())));
        assert_eq!(rows[0].get("isComplete"), Some(&Value::Bool(false)));
    }

    #[test]
    fn failed_migration_rolls_back_and_still_finishes() {
        let db = Database::open_in_memory().unwrap();
        let (source, destination) = migration_fixture(&db);
        db.query("INSERT INTO task_v1 (itemID, label) VALUES (1, 'only')", &[])
            .unwrap();
        db.query("INSERT INTO task_v2 (itemID, title) VALUES (1, 'taken')", &[])
            .unwrap();

        let rx = db.events().subscribe();
        // Destination key 1 is taken, so the copy violates the primary key.
        let migration = DataMigration::new("collides", source, destination.clone())
            .map("itemID", "itemID")
            .map("title", "label");
        let error = db.migrate_data(&migration).unwrap_err();
        assert!(matches!(error, CoreError::TransactionRolledBack { .. }));

        assert_eq!(rx.recv().unwrap(), DatabaseEvent::MigrationBegan);
        assert_eq!(rx.recv().unwrap(), DatabaseEvent::MigrationFinished);

        let rows = db
            .select_from(&destination, Projection::Detail, &CriteriaQuery::new())
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn supplied_values_render_as_literals() {
        let migration = DataMigration::new(
            "m",
            TableDefinition::new("src"),
            TableDefinition::new("dst")
                .column(ColumnDefinition::new("flag", Affinity::Boolean))
                .column(ColumnDefinition::new("note", Affinity::Text).with_sequence(1)),
        )
        .map("id", "id")
        .supply("flag", true)
        .supply("note", "it's done");
        assert_eq!(
            migration.insert_select_sql().unwrap(),
            "INSERT INTO dst (id, flag, note) SELECT id, 1, 'it''s done' FROM src"
        );
    }

    #[test]
    fn empty_migration_is_misuse() {
        let migration = DataMigration::new(
            "m",
            TableDefinition::new("src"),
            TableDefinition::new("dst"),
        );
        assert!(matches!(
            migration.insert_select_sql(),
            Err(CoreError::Misuse { .. })
        ));
    }
}
