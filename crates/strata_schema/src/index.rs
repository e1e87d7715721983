//! Index definitions.

/// An index over one table.
///
/// The index is created in the same attached database as its table, so
/// only the index name carries the schema qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    name: String,
    schema: Option<String>,
    table: String,
    columns: Vec<String>,
    where_expression: Option<String>,
    unique: bool,
}

impl IndexDefinition {
    /// Creates an index on `table` over `columns`.
    pub fn new<I, S>(name: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            schema: None,
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            where_expression: None,
            unique: false,
        }
    }

    /// Places the index under an attached-database alias.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Makes the index partial, with the given `WHERE` expression.
    #[must_use]
    pub fn with_where(mut self, expression: impl Into<String>) -> Self {
        self.where_expression = Some(expression.into());
        self
    }

    /// Makes the index unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema-qualified index name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Renders the complete `CREATE INDEX` statement.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut sql = String::from("CREATE ");
        if self.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!(
            "INDEX {} ON {} ({})",
            self.qualified_name(),
            self.table,
            self.columns.join(", ")
        ));
        if let Some(expression) = &self.where_expression {
            sql.push_str(&format!(" WHERE {expression}"));
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_index() {
        assert_eq!(
            IndexDefinition::new("ix_person_name", "person", ["lastName", "firstName"]).create_sql(),
            "CREATE INDEX ix_person_name ON person (lastName, firstName)"
        );
    }

    #[test]
    fn unique_partial_index_in_attached_schema() {
        let index = IndexDefinition::new("ix_active", "task", ["dueDT"])
            .in_schema("archive")
            .unique()
            .with_where("isComplete = 0");
        assert_eq!(
            index.create_sql(),
            "CREATE UNIQUE INDEX archive.ix_active ON task (dueDT) WHERE isComplete = 0"
        );
    }
}
