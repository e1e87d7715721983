//! Table-level constraints.

use crate::conflict::ConflictResolution;

/// The kind of table constraint being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStyle {
    /// `PRIMARY KEY (columns)`.
    PrimaryKey,
    /// `UNIQUE (columns)`.
    Unique,
    /// `CHECK (expression)`.
    Check,
    /// `FOREIGN KEY (columns) REFERENCES table (columns)`.
    ForeignKey,
}

/// A named table-level constraint.
///
/// Rendered after the column fragments of a `CREATE TABLE` statement.
/// Structural checks (declared columns, required reference) are performed
/// by [`TableDefinition::validate`](crate::TableDefinition::validate), not
/// here; `body` renders whatever it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraintDefinition {
    name: String,
    style: ConstraintStyle,
    columns: Vec<String>,
    check_expression: Option<String>,
    reference_table: Option<String>,
    reference_columns: Vec<String>,
    conflict: Option<ConflictResolution>,
}

impl TableConstraintDefinition {
    /// Creates a constraint of the given style.
    pub fn new(name: impl Into<String>, style: ConstraintStyle) -> Self {
        Self {
            name: name.into(),
            style,
            columns: Vec::new(),
            check_expression: None,
            reference_table: None,
            reference_columns: Vec::new(),
            conflict: None,
        }
    }

    /// Sets the constrained columns.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the CHECK expression, rendered verbatim inside parentheses.
    #[must_use]
    pub fn with_check(mut self, expression: impl Into<String>) -> Self {
        self.check_expression = Some(expression.into());
        self
    }

    /// Sets the foreign-key reference.
    #[must_use]
    pub fn with_reference<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_table = Some(table.into());
        self.reference_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the conflict clause. Only primary-key and unique constraints
    /// render it.
    #[must_use]
    pub fn with_conflict(mut self, conflict: ConflictResolution) -> Self {
        self.conflict = Some(conflict);
        self
    }

    /// The constraint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint style.
    #[must_use]
    pub fn style(&self) -> ConstraintStyle {
        self.style
    }

    /// The constrained columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The CHECK expression, if any.
    #[must_use]
    pub fn check_expression(&self) -> Option<&str> {
        self.check_expression.as_deref()
    }

    /// Whether a foreign-key reference has been supplied.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.reference_table.is_some() && !self.reference_columns.is_empty()
    }

    /// Renders the `CONSTRAINT <name> …` body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut body = format!("CONSTRAINT {} ", self.name);
        match self.style {
            ConstraintStyle::PrimaryKey => {
                body.push_str(&format!("PRIMARY KEY ({})", self.columns.join(", ")));
                self.push_conflict(&mut body);
            }
            ConstraintStyle::Unique => {
                body.push_str(&format!("UNIQUE ({})", self.columns.join(", ")));
                self.push_conflict(&mut body);
            }
            ConstraintStyle::Check => {
                let expression = self.check_expression.as_deref().unwrap_or_default();
                body.push_str(&format!("CHECK ({expression})"));
            }
            ConstraintStyle::ForeignKey => {
                body.push_str(&format!("FOREIGN KEY ({})", self.columns.join(", ")));
                if let Some(table) = &self.reference_table {
                    body.push_str(&format!(
                        " REFERENCES {} ({})",
                        table,
                        self.reference_columns.join(", ")
                    ));
                }
            }
        }
        body
    }

    fn push_conflict(&self, body: &mut String) {
        if let Some(conflict) = self.conflict {
            body.push_str(" ON CONFLICT ");
            body.push_str(conflict.keyword());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_renders_conflict_clause() {
        let constraint = TableConstraintDefinition::new("uq_person_name", ConstraintStyle::Unique)
            .with_columns(["firstName", "lastName"])
            .with_conflict(ConflictResolution::Ignore);
        assert_eq!(
            constraint.body(),
            "CONSTRAINT uq_person_name UNIQUE (firstName, lastName) ON CONFLICT IGNORE"
        );
    }

    #[test]
    fn check_renders_its_expression_verbatim() {
        let constraint = TableConstraintDefinition::new("ck_age", ConstraintStyle::Check)
            .with_check("age >= 0");
        assert_eq!(constraint.body(), "CONSTRAINT ck_age CHECK (age >= 0)");
    }

    #[test]
    fn foreign_key_renders_reference() {
        let constraint = TableConstraintDefinition::new("fk_owner", ConstraintStyle::ForeignKey)
            .with_columns(["ownerID"])
            .with_reference("person", ["itemID"]);
        assert_eq!(
            constraint.body(),
            "CONSTRAINT fk_owner FOREIGN KEY (ownerID) REFERENCES person (itemID)"
        );
    }
}
