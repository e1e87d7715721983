//! Inspect command implementation.

use serde::Serialize;
use std::path::Path;
use strata_core::{ColumnItem, Config, Database, DatabaseItem};
use tracing::info;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// Attached databases, primary first.
    pub databases: Vec<DatabaseItem>,
    /// Schema cookie of the primary database.
    pub schema_version: i64,
    /// Column metadata (if a table was requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnItem>>,
}

/// Runs the inspect command.
pub fn run(path: &Path, table: Option<&str>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "inspect");

    let db = Database::with_config(path, Config::new().create_if_missing(false));
    db.open()?;

    let mut result = InspectResult {
        path: path.display().to_string(),
        databases: db.database_list()?,
        schema_version: db.schema_version(None)?,
        columns: None,
    };

    if let Some(table) = table {
        let columns = db.table_info(table)?;
        if columns.is_empty() {
            return Err(format!("No table named '{table}' in {path:?}").into());
        }
        result.columns = Some(columns);
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result, table);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult, table: Option<&str>) {
    println!("Strata Database Inspection");
    println!("==========================");
    println!();
    println!("Path: {}", result.path);
    println!("Schema version: {}", result.schema_version);
    println!();
    println!("Databases:");
    for item in &result.databases {
        let file = if item.file.is_empty() {
            "(in memory)"
        } else {
            item.file.as_str()
        };
        println!("  [{}] {} {}", item.seq, item.name, file);
    }

    if let (Some(table), Some(columns)) = (table, &result.columns) {
        println!();
        println!("Columns of {table}:");
        for column in columns {
            let mut notes = Vec::new();
            if column.primary_key {
                notes.push("primary key".to_string());
            }
            if column.not_null {
                notes.push("not null".to_string());
            }
            if let Some(default) = &column.default_value {
                notes.push(format!("default {default}"));
            }
            let suffix = if notes.is_empty() {
                String::new()
            } else {
                format!(" ({})", notes.join(", "))
            };
            println!(
                "  [{}] {} {}{}",
                column.cid, column.name, column.column_type, suffix
            );
        }
    }
}
