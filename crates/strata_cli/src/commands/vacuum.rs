//! Vacuum command implementation.

use std::path::Path;
use strata_core::{Config, Database};
use tracing::info;

/// Runs the vacuum command.
pub fn run(path: &Path, schema: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "vacuum");

    let db = Database::with_config(path, Config::new().create_if_missing(false));
    db.open()?;
    db.vacuum(schema)?;

    println!("Vacuumed {} in {:?}", schema.unwrap_or("main"), path);
    Ok(())
}
