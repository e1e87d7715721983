//! Table definitions: validation, DDL and select-list rendering.

use crate::column::ColumnDefinition;
use crate::constraint::{ConstraintStyle, TableConstraintDefinition};
use crate::error::{SchemaError, SchemaResult};
use std::collections::HashSet;

/// Which column subset a select reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The list subset, for summary rows.
    List,
    /// The detail subset, for full rows.
    Detail,
}

/// An immutable table definition.
///
/// Columns render in `sequence` order regardless of declaration order;
/// constraints render in declaration order after the columns. `schema` is
/// the attached-database alias the table lives under (`None` is the primary
/// database).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    table: String,
    alias: Option<String>,
    schema: Option<String>,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraintDefinition>,
}

impl TableDefinition {
    /// Creates an empty definition for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            schema: None,
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Places the table under an attached-database alias.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the alias used in `FROM` clauses.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a table constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: TableConstraintDefinition) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// The bare table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The attached-database alias, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The declared columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// The declared constraints, in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[TableConstraintDefinition] {
        &self.constraints
    }

    /// The schema-qualified table name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// The `FROM` clause target, with alias when one is set.
    #[must_use]
    pub fn from_clause(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.qualified_name()),
            None => self.qualified_name(),
        }
    }

    /// Columns of the given projection, in sequence order.
    fn projected(&self, projection: Projection) -> Vec<&ColumnDefinition> {
        let mut columns: Vec<&ColumnDefinition> = self
            .columns
            .iter()
            .filter(|column| match projection {
                Projection::List => column.include().list,
                Projection::Detail => column.include().detail,
            })
            .collect();
        columns.sort_by_key(|column| column.sequence());
        columns
    }

    /// Renders the select list for a projection.
    ///
    /// Falls back to `*` when no column participates in the projection.
    #[must_use]
    pub fn select_list(&self, projection: Projection) -> String {
        let columns = self.projected(projection);
        if columns.is_empty() {
            return "*".to_string();
        }
        columns
            .iter()
            .map(|column| column.select_fragment())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders the complete `CREATE TABLE` statement.
    ///
    /// Virtual columns are skipped; constraint bodies follow the column
    /// fragments.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let mut columns: Vec<&ColumnDefinition> = self.columns.iter().collect();
        columns.sort_by_key(|column| column.sequence());
        let mut items: Vec<String> = columns
            .iter()
            .filter_map(|column| column.create_fragment())
            .collect();
        items.extend(self.constraints.iter().map(TableConstraintDefinition::body));
        format!("CREATE TABLE {} ({})", self.qualified_name(), items.join(", "))
    }

    /// Validates the definition structurally.
    ///
    /// Catches what the engine would reject (or silently accept and then
    /// misbehave on) before any DDL is rendered: an empty column list,
    /// duplicate sequences, competing primary keys, constraints over
    /// undeclared columns, foreign keys without a reference and checks
    /// without an expression.
    pub fn validate(&self) -> SchemaResult<()> {
        let concrete: Vec<&ColumnDefinition> = self
            .columns
            .iter()
            .filter(|column| !column.is_virtual())
            .collect();
        if concrete.is_empty() {
            return Err(SchemaError::no_columns(&self.table));
        }

        let mut sequences = HashSet::new();
        for column in &concrete {
            if !sequences.insert(column.sequence()) {
                return Err(SchemaError::duplicate_sequence(
                    &self.table,
                    column.sequence(),
                ));
            }
        }

        let flagged = concrete
            .iter()
            .filter(|column| column.options().primary_key)
            .count();
        let constrained = self
            .constraints
            .iter()
            .filter(|constraint| constraint.style() == ConstraintStyle::PrimaryKey)
            .count();
        if flagged + constrained > 1 {
            return Err(SchemaError::multiple_primary_keys(&self.table));
        }

        let declared: HashSet<&str> = concrete.iter().map(|column| column.name()).collect();
        for constraint in &self.constraints {
            for column in constraint.columns() {
                if !declared.contains(column.as_str()) {
                    return Err(SchemaError::unknown_constraint_column(
                        &self.table,
                        constraint.name(),
                        column,
                    ));
                }
            }
            match constraint.style() {
                ConstraintStyle::ForeignKey if !constraint.has_reference() => {
                    return Err(SchemaError::missing_reference(
                        &self.table,
                        constraint.name(),
                    ));
                }
                ConstraintStyle::Check if constraint.check_expression().is_none() => {
                    return Err(SchemaError::missing_check(&self.table, constraint.name()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnInclude;
    use strata_codec::Affinity;

    fn person() -> TableDefinition {
        TableDefinition::new("person")
            .column(
                ColumnDefinition::new("itemID", Affinity::Integer)
                    .primary_key()
                    .autoincrement(),
            )
            .column(ColumnDefinition::new("name", Affinity::Text).with_sequence(1))
            .column(
                ColumnDefinition::new("biography", Affinity::Text)
                    .with_sequence(2)
                    .with_include(ColumnInclude {
                        list: false,
                        detail: true,
                    }),
            )
            .column(ColumnDefinition::virtual_class("Person").with_sequence(3))
    }

    #[test]
    fn columns_render_in_sequence_order() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("b", Affinity::Text).with_sequence(1))
            .column(ColumnDefinition::new("a", Affinity::Integer).with_sequence(0));
        assert_eq!(table.create_table_sql(), "CREATE TABLE t (a INTEGER, b TEXT)");
    }

    #[test]
    fn virtual_column_is_selected_but_not_created() {
        let table = person();
        assert!(!table.create_table_sql().contains("class"));
        assert_eq!(
            table.select_list(Projection::Detail),
            "itemID, name, biography, 'Person' AS class"
        );
    }

    #[test]
    fn list_projection_drops_detail_only_columns() {
        assert_eq!(
            person().select_list(Projection::List),
            "itemID, name, 'Person' AS class"
        );
    }

    #[test]
    fn schema_qualification_and_alias() {
        let table = TableDefinition::new("person")
            .in_schema("archive")
            .with_alias("p");
        assert_eq!(table.qualified_name(), "archive.person");
        assert_eq!(table.from_clause(), "archive.person AS p");
    }

    #[test]
    fn constraints_follow_columns() {
        let table = TableDefinition::new("pet")
            .column(ColumnDefinition::new("ownerID", Affinity::Integer))
            .constraint(
                TableConstraintDefinition::new("fk_owner", ConstraintStyle::ForeignKey)
                    .with_columns(["ownerID"])
                    .with_reference("person", ["itemID"]),
            );
        assert_eq!(
            table.create_table_sql(),
            "CREATE TABLE pet (ownerID INTEGER, \
             CONSTRAINT fk_owner FOREIGN KEY (ownerID) REFERENCES person (itemID))"
        );
    }

    #[test]
    fn validate_rejects_two_primary_keys() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer).primary_key())
            .column(
                ColumnDefinition::new("b", Affinity::Integer)
                    .with_sequence(1)
                    .primary_key(),
            );
        assert_eq!(
            table.validate(),
            Err(SchemaError::multiple_primary_keys("t"))
        );
    }

    #[test]
    fn validate_rejects_flag_competing_with_constraint() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer).primary_key())
            .column(ColumnDefinition::new("b", Affinity::Integer).with_sequence(1))
            .constraint(
                TableConstraintDefinition::new("pk_t", ConstraintStyle::PrimaryKey)
                    .with_columns(["b"]),
            );
        assert_eq!(
            table.validate(),
            Err(SchemaError::multiple_primary_keys("t"))
        );
    }

    #[test]
    fn validate_rejects_duplicate_sequences() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer).with_sequence(2))
            .column(ColumnDefinition::new("b", Affinity::Integer).with_sequence(2));
        assert_eq!(
            table.validate(),
            Err(SchemaError::duplicate_sequence("t", 2))
        );
    }

    #[test]
    fn validate_rejects_constraint_over_undeclared_column() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer))
            .constraint(
                TableConstraintDefinition::new("uq", ConstraintStyle::Unique)
                    .with_columns(["missing"]),
            );
        assert_eq!(
            table.validate(),
            Err(SchemaError::unknown_constraint_column("t", "uq", "missing"))
        );
    }

    #[test]
    fn validate_rejects_incomplete_foreign_key_and_check() {
        let dangling = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer))
            .constraint(
                TableConstraintDefinition::new("fk", ConstraintStyle::ForeignKey)
                    .with_columns(["a"]),
            );
        assert_eq!(dangling.validate(), Err(SchemaError::missing_reference("t", "fk")));

        let empty_check = TableDefinition::new("t")
            .column(ColumnDefinition::new("a", Affinity::Integer))
            .constraint(TableConstraintDefinition::new("ck", ConstraintStyle::Check));
        assert_eq!(empty_check.validate(), Err(SchemaError::missing_check("t", "ck")));
    }

    #[test]
    fn validate_accepts_the_fixture() {
        assert_eq!(person().validate(), Ok(()));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(
            TableDefinition::new("t").validate(),
            Err(SchemaError::no_columns("t"))
        );
    }
}
