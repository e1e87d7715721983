//! Verify command implementation.

use std::path::Path;
use strata_core::{Config, Database, ForeignKeyCheckItem};
use tracing::info;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Problems reported by the integrity check.
    pub integrity_problems: Vec<String>,
    /// Rows with broken foreign-key references.
    pub foreign_key_violations: Vec<ForeignKeyCheckItem>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.integrity_problems.is_empty() && self.foreign_key_violations.is_empty()
    }
}

/// Runs the verify command.
pub fn run(
    path: &Path,
    schema: Option<&str>,
    table: Option<&str>,
    max_rows: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "verify");
    println!("Verifying database at {:?}", path);
    println!();

    let db = Database::with_config(path, Config::new().create_if_missing(false));
    db.open()?;

    println!("Checking integrity...");
    let integrity_problems = db.integrity_check(schema, max_rows)?;

    println!("Checking foreign keys...");
    let foreign_key_violations = db.foreign_key_check(schema, table)?;

    let result = VerifyResult {
        integrity_problems,
        foreign_key_violations,
    };
    print_result(&result);

    println!();
    if result.is_ok() {
        println!("✓ Database verification passed");
        Ok(())
    } else {
        println!("✗ Database verification failed");
        Err("Verification failed".into())
    }
}

fn print_result(result: &VerifyResult) {
    println!(
        "  Integrity problems: {}, foreign-key violations: {}",
        result.integrity_problems.len(),
        result.foreign_key_violations.len()
    );
    for problem in &result.integrity_problems {
        println!("    ERROR: {}", problem);
    }
    for violation in &result.foreign_key_violations {
        let rowid = violation
            .rowid
            .map_or_else(|| "?".to_string(), |rowid| rowid.to_string());
        println!(
            "    ERROR: {} rowid {} references missing row in {} (constraint {})",
            violation.table, rowid, violation.parent, violation.fkid
        );
    }
}
