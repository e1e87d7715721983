//! # Strata Core
//!
//! The access layer proper: one [`Database`] handle per SQLite file, a
//! four-stage statement pipeline with per-stage error capture, a criteria
//! compiler for structured queries, an entity-schema registry,
//! introspection, and two kinds of migration (versioned schema migrations
//! and table-to-table data copies).
//!
//! ## Usage
//!
//! ```
//! use strata_core::{CriteriaMap, CriteriaQuery, Database};
//! use strata_schema::{
//!     Affinity, ColumnDefinition, ConflictResolution, Projection, TableDefinition,
//! };
//!
//! # fn main() -> strata_core::CoreResult<()> {
//! let table = TableDefinition::new("task")
//!     .column(ColumnDefinition::new("itemID", Affinity::Integer).primary_key())
//!     .column(ColumnDefinition::new("title", Affinity::Text).with_sequence(1))
//!     .column(ColumnDefinition::new("isComplete", Affinity::Boolean).with_sequence(2));
//!
//! let db = Database::open_in_memory()?;
//! db.create_table(&table)?;
//! db.insert(
//!     &table,
//!     &CriteriaMap::new()
//!         .with("title", "write the report")
//!         .with("isComplete", false),
//!     ConflictResolution::default(),
//! )?;
//!
//! let done = CriteriaQuery::new().group(CriteriaMap::new().with("isComplete", false));
//! let rows = db.select_from(&table, Projection::Detail, &done)?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connection;
mod criteria;
mod ddl;
mod error;
mod events;
mod introspect;
mod migration;
mod registry;
mod result;

pub use config::Config;
pub use connection::{CloseOutcome, Database, OpenOutcome};
pub use criteria::{CriteriaMap, CriteriaQuery, SortDirection, WhereClauseItem};
pub use ddl::DataMigration;
pub use error::{CoreError, CoreResult};
pub use events::{DatabaseEvent, EventFeed};
pub use introspect::{engine_version, ColumnItem, DatabaseItem, ForeignKeyCheckItem};
pub use migration::{Migration, MigrationContext, MigrationManager};
pub use registry::{EntitySchema, SchemaRegistry};
pub use result::{DatabaseResult, Row};

pub use strata_codec::{Affinity, Primitive, Value};
pub use strata_schema::{ConflictResolution, Projection};
