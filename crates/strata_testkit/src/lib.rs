//! # Strata Testkit
//!
//! Test utilities for Strata.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strata_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_database() {
//!     with_test_db(|db| {
//!         let rows = db.select("Task", Projection::Detail, &CriteriaQuery::new()).unwrap();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
