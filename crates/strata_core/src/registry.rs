//! The entity-schema registry.
//!
//! Callers register a provider closure per entity name; the registry runs
//! the provider at most once, validates the produced table definition and
//! caches the result behind an `Arc`. Providers are cheap to register at
//! startup even for entities the process never touches.

use crate::error::{CoreError, CoreResult};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use strata_schema::{IndexDefinition, TableDefinition, TriggerDefinition};

/// The complete schema of one entity: its table plus the indexes and
/// triggers that ship with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    table: TableDefinition,
    indexes: Vec<IndexDefinition>,
    triggers: Vec<TriggerDefinition>,
}

impl EntitySchema {
    /// Creates a schema holding only a table.
    #[must_use]
    pub fn new(table: TableDefinition) -> Self {
        Self {
            table,
            indexes: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Adds an index.
    #[must_use]
    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// The table definition.
    #[must_use]
    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    /// The index definitions, in registration order.
    #[must_use]
    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.indexes
    }

    /// The trigger definitions, in registration order.
    #[must_use]
    pub fn triggers(&self) -> &[TriggerDefinition] {
        &self.triggers
    }

    /// Every DDL statement needed to create the entity, table first, then
    /// indexes, then triggers.
    #[must_use]
    pub fn create_statements(&self) -> Vec<String> {
        let mut statements = vec![self.table.create_table_sql()];
        statements.extend(self.indexes.iter().map(IndexDefinition::create_sql));
        statements.extend(self.triggers.iter().map(TriggerDefinition::create_sql));
        statements
    }
}

type SchemaProvider = Box<dyn Fn() -> EntitySchema + Send + Sync>;

/// Maps entity names to lazily built, validated [`EntitySchema`]s.
#[derive(Default)]
pub struct SchemaRegistry {
    providers: RwLock<HashMap<String, SchemaProvider>>,
    built: Mutex<HashMap<String, Arc<EntitySchema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema provider for `entity`.
    ///
    /// Re-registering replaces the provider and drops the cached schema,
    /// so the next lookup rebuilds.
    pub fn register(
        &self,
        entity: impl Into<String>,
        provider: impl Fn() -> EntitySchema + Send + Sync + 'static,
    ) {
        let entity = entity.into();
        self.built.lock().remove(&entity);
        self.providers.write().insert(entity, Box::new(provider));
    }

    /// Registers a bare table as the schema for `entity`.
    pub fn register_table(&self, entity: impl Into<String>, table: TableDefinition) {
        self.register(entity, move || EntitySchema::new(table.clone()));
    }

    /// Looks the schema for `entity` up, building and validating it on
    /// first use.
    pub fn schema(&self, entity: &str) -> CoreResult<Arc<EntitySchema>> {
        let mut built = self.built.lock();
        if let Some(schema) = built.get(entity) {
            return Ok(Arc::clone(schema));
        }

        let providers = self.providers.read();
        let provider = providers
            .get(entity)
            .ok_or_else(|| CoreError::unknown_entity(entity))?;
        let schema = provider();
        schema.table().validate()?;

        let schema = Arc::new(schema);
        built.insert(entity.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Whether a provider is registered for `entity`.
    #[must_use]
    pub fn contains(&self, entity: &str) -> bool {
        self.providers.read().contains_key(entity)
    }

    /// Registered entity names, in lexical order.
    #[must_use]
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("entities", &self.entities())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strata_codec::Affinity;
    use strata_schema::ColumnDefinition;

    fn person_table() -> TableDefinition {
        TableDefinition::new("person")
            .column(
                ColumnDefinition::new("itemID", Affinity::Integer)
                    .primary_key()
                    .autoincrement(),
            )
            .column(ColumnDefinition::new("name", Affinity::Text).with_sequence(1))
    }

    #[test]
    fn schemas_build_once_and_cache() {
        let registry = SchemaRegistry::new();
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        registry.register("Person", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            EntitySchema::new(person_table())
        });

        let first = registry.schema("Person").unwrap();
        let second = registry.schema("Person").unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_entity_is_reported_by_name() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.schema("Ghost"),
            Err(CoreError::unknown_entity("Ghost"))
        );
    }

    #[test]
    fn invalid_table_fails_at_first_lookup() {
        let registry = SchemaRegistry::new();
        registry.register_table("Empty", TableDefinition::new("empty"));
        assert!(matches!(
            registry.schema("Empty"),
            Err(CoreError::Schema(_))
        ));
    }

    #[test]
    fn re_registration_rebuilds() {
        let registry = SchemaRegistry::new();
        registry.register_table("Person", person_table());
        assert_eq!(registry.schema("Person").unwrap().table().table(), "person");

        registry.register_table("Person", person_table().in_schema("archive"));
        assert_eq!(
            registry.schema("Person").unwrap().table().qualified_name(),
            "archive.person"
        );
    }

    #[test]
    fn create_statements_order_table_indexes_triggers() {
        let schema = EntitySchema::new(person_table())
            .with_index(IndexDefinition::new("ix_person_name", "person", ["name"]))
            .with_trigger(strata_schema::TriggerDefinition::new(
                "tg_person",
                "person",
                strata_schema::TriggerTiming::After,
                strata_schema::TriggerEvent::Insert,
                "SELECT 1",
            ));
        let statements = schema.create_statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE person"));
        assert!(statements[1].starts_with("CREATE INDEX ix_person_name"));
        assert!(statements[2].starts_with("CREATE TRIGGER tg_person"));
    }

    #[test]
    fn entities_list_lexically() {
        let registry = SchemaRegistry::new();
        registry.register_table("Zebra", person_table());
        registry.register_table("Aardvark", person_table());
        assert_eq!(registry.entities(), ["Aardvark", "Zebra"]);
        assert!(registry.contains("Zebra"));
        assert!(!registry.contains("zebra"));
    }
}
