//! # Strata Schema
//!
//! The schema model: immutable definitions of tables, columns, constraints,
//! indexes and triggers, each able to render the SQL fragment or statement
//! it describes. Rendering is a pure function of the definition; nothing in
//! this crate touches the engine.
//!
//! A [`TableDefinition`] validates itself structurally before any DDL is
//! rendered, so impossible schemas (duplicate sequences, two primary keys,
//! constraints over undeclared columns) are rejected without a round-trip
//! to the engine.
//!
//! ## Usage
//!
//! ```
//! use strata_schema::{Affinity, ColumnDefinition, TableDefinition};
//!
//! let table = TableDefinition::new("person")
//!     .column(
//!         ColumnDefinition::new("itemID", Affinity::Integer)
//!             .primary_key()
//!             .autoincrement(),
//!     )
//!     .column(ColumnDefinition::new("name", Affinity::Text).with_sequence(1));
//!
//! table.validate().unwrap();
//! assert_eq!(
//!     table.create_table_sql(),
//!     "CREATE TABLE person (itemID INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod column;
mod conflict;
mod constraint;
mod error;
mod index;
mod table;
mod trigger;

pub use column::{ColumnDefinition, ColumnInclude, ColumnOptions, CLASS_PROPERTY};
pub use conflict::ConflictResolution;
pub use constraint::{ConstraintStyle, TableConstraintDefinition};
pub use error::{SchemaError, SchemaResult};
pub use index::IndexDefinition;
pub use table::{Projection, TableDefinition};
pub use trigger::{TriggerDefinition, TriggerEvent, TriggerTiming};

pub use strata_codec::Affinity;
