//! Version command implementation.

use std::path::Path;
use strata_core::{engine_version, Config, Database};

/// Runs the version command.
pub fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Strata CLI v{}", env!("CARGO_PKG_VERSION"));
    println!("SQLite {}", engine_version());

    if let Some(path) = path {
        let db = Database::with_config(path, Config::new().create_if_missing(false));
        db.open()?;
        println!("Schema version of {:?}: {}", path, db.schema_version(None)?);
    }

    Ok(())
}
