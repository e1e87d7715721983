//! Column definitions and their rendered fragments.

use strata_codec::Affinity;

/// Property name reserved for the virtual discriminator column.
///
/// A column mapped to this property never appears in DDL; its select
/// fragment yields the entity-type name as a literal.
pub const CLASS_PROPERTY: &str = "class";

/// Which select projections a column participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInclude {
    /// Included in the LIST projection.
    pub list: bool,
    /// Included in the DETAIL projection.
    pub detail: bool,
}

impl Default for ColumnInclude {
    fn default() -> Self {
        Self {
            list: true,
            detail: true,
        }
    }
}

/// Column-level DDL flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnOptions {
    /// Renders `NOT NULL`.
    pub not_null: bool,
    /// Renders `PRIMARY KEY`.
    pub primary_key: bool,
    /// Renders `AUTOINCREMENT`. Only meaningful on an integer primary key.
    pub autoincrement: bool,
}

/// One column of a table definition.
///
/// A column carries both its DDL shape (affinity, flags, default) and its
/// read shape (projection membership, the property name rows expose it
/// under). `sequence` fixes the column order in DDL and select lists
/// independently of declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    name: String,
    affinity: Option<Affinity>,
    default_literal: Option<String>,
    property: Option<String>,
    include: ColumnInclude,
    options: ColumnOptions,
    entity_type: Option<String>,
    sequence: u32,
}

impl ColumnDefinition {
    /// Creates a column with a declared affinity.
    pub fn new(name: impl Into<String>, affinity: Affinity) -> Self {
        Self {
            name: name.into(),
            affinity: Some(affinity),
            default_literal: None,
            property: None,
            include: ColumnInclude::default(),
            options: ColumnOptions::default(),
            entity_type: None,
            sequence: 0,
        }
    }

    /// Creates a column with no declared affinity; values bind by their
    /// natural storage class.
    pub fn untyped(name: impl Into<String>) -> Self {
        let mut column = Self::new(name, Affinity::Null);
        column.affinity = None;
        column
    }

    /// Creates the virtual discriminator column for `entity_type`.
    ///
    /// Never rendered in DDL; selects read `'<EntityType>' AS class`.
    pub fn virtual_class(entity_type: impl Into<String>) -> Self {
        let mut column = Self::untyped(CLASS_PROPERTY);
        column.property = Some(CLASS_PROPERTY.to_string());
        column.entity_type = Some(entity_type.into());
        column
    }

    /// Sets the ordering sequence.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets the DDL default literal, rendered verbatim after `DEFAULT`.
    #[must_use]
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_literal = Some(literal.into());
        self
    }

    /// Maps the column to a differently-named property; select fragments
    /// then render `column AS property`.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Sets projection membership.
    #[must_use]
    pub fn with_include(mut self, include: ColumnInclude) -> Self {
        self.include = include;
        self
    }

    /// Sets all DDL flags at once.
    #[must_use]
    pub fn with_options(mut self, options: ColumnOptions) -> Self {
        self.options = options;
        self
    }

    /// Flags the column `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.options.not_null = true;
        self
    }

    /// Flags the column `PRIMARY KEY`.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.options.primary_key = true;
        self
    }

    /// Flags the column `AUTOINCREMENT`.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.options.autoincrement = true;
        self
    }

    /// The column name as declared in the table.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared affinity, if any.
    #[must_use]
    pub fn affinity(&self) -> Option<Affinity> {
        self.affinity
    }

    /// The property name rows expose this column under.
    #[must_use]
    pub fn property_name(&self) -> &str {
        self.property.as_deref().unwrap_or(&self.name)
    }

    /// Projection membership.
    #[must_use]
    pub fn include(&self) -> ColumnInclude {
        self.include
    }

    /// DDL flags.
    #[must_use]
    pub fn options(&self) -> ColumnOptions {
        self.options
    }

    /// Ordering sequence.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Whether this is the virtual discriminator column.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.property.as_deref() == Some(CLASS_PROPERTY)
    }

    /// The DDL fragment for this column, or `None` for the virtual column.
    #[must_use]
    pub fn create_fragment(&self) -> Option<String> {
        if self.is_virtual() {
            return None;
        }
        let mut fragment = self.name.clone();
        if let Some(affinity) = self.affinity {
            fragment.push(' ');
            fragment.push_str(affinity.sql_name());
        }
        if self.options.primary_key {
            fragment.push_str(" PRIMARY KEY");
        }
        if self.options.autoincrement {
            fragment.push_str(" AUTOINCREMENT");
        }
        if self.options.not_null {
            fragment.push_str(" NOT NULL");
        }
        if let Some(literal) = &self.default_literal {
            fragment.push_str(" DEFAULT ");
            fragment.push_str(literal);
        }
        Some(fragment)
    }

    /// The select-list fragment for this column.
    #[must_use]
    pub fn select_fragment(&self) -> String {
        if self.is_virtual() {
            if let Some(entity) = &self.entity_type {
                return format!("'{entity}' AS {CLASS_PROPERTY}");
            }
        }
        match &self.property {
            Some(property) if property != &self.name => {
                format!("{} AS {}", self.name, property)
            }
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_renders_flags_in_ddl_order() {
        let column = ColumnDefinition::new("itemID", Affinity::Integer)
            .primary_key()
            .autoincrement()
            .not_null();
        assert_eq!(
            column.create_fragment().unwrap(),
            "itemID INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL"
        );
    }

    #[test]
    fn extended_affinities_declare_their_storage_class() {
        let column = ColumnDefinition::new("isComplete", Affinity::Boolean).with_default("0");
        assert_eq!(
            column.create_fragment().unwrap(),
            "isComplete INTEGER DEFAULT 0"
        );
    }

    #[test]
    fn untyped_column_renders_bare_name() {
        assert_eq!(
            ColumnDefinition::untyped("payload").create_fragment().unwrap(),
            "payload"
        );
    }

    #[test]
    fn renamed_column_selects_with_alias() {
        let column = ColumnDefinition::new("insertedDT", Affinity::DateTime).with_property("inserted");
        assert_eq!(column.select_fragment(), "insertedDT AS inserted");
        assert_eq!(column.property_name(), "inserted");
    }

    #[test]
    fn virtual_column_never_reaches_ddl() {
        let column = ColumnDefinition::virtual_class("Person");
        assert!(column.is_virtual());
        assert_eq!(column.create_fragment(), None);
        assert_eq!(column.select_fragment(), "'Person' AS class");
    }
}
