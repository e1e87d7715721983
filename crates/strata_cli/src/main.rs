//! Strata CLI
//!
//! Command-line tools for Strata database maintenance.
//!
//! # Commands
//!
//! - `inspect` - Display attached databases and table metadata
//! - `verify` - Run the integrity and foreign-key checks
//! - `vacuum` - Rebuild the database file to reclaim free pages
//! - `version` - Show tool, engine, and schema version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Strata command-line database tools.
#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long)]
    db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display attached databases and table metadata
    Inspect {
        /// Describe this table's columns
        #[arg(short, long)]
        table: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run the integrity and foreign-key checks
    Verify {
        /// Restrict the integrity check to one attached database
        #[arg(short, long)]
        schema: Option<String>,

        /// Only report foreign-key violations in this table
        #[arg(short, long)]
        table: Option<String>,

        /// Maximum number of problems to report (0 uses the engine default)
        #[arg(short, long, default_value = "0")]
        max_rows: usize,
    },

    /// Rebuild a database file to reclaim free pages
    Vacuum {
        /// Vacuum this attached database instead of the primary one
        #[arg(short, long)]
        schema: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { table, format } => {
            let path = cli.db.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, table.as_deref(), &format)?;
        }
        Commands::Verify {
            schema,
            table,
            max_rows,
        } => {
            let path = cli.db.ok_or("Database path required for verify")?;
            commands::verify::run(&path, schema.as_deref(), table.as_deref(), max_rows)?;
        }
        Commands::Vacuum { schema } => {
            let path = cli.db.ok_or("Database path required for vacuum")?;
            commands::vacuum::run(&path, schema.as_deref())?;
        }
        Commands::Version => {
            commands::version::run(cli.db.as_deref())?;
        }
    }

    Ok(())
}
