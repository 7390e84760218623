//! entindex CLI
//!
//! Command-line front end for the entindex engine. Batches and mappings
//! are read from and written to JSON files of the form
//! `{"columns": [...], "rows": [[...], ...]}`.
//!
//! # Commands
//!
//! - `index` - Assign indices for one entity kind and write mapping/views
//! - `polish` - Standardize column names, key values and column order
//! - `inspect` - Display schema, row count and a preview of a batch

mod commands;

use clap::{Parser, Subcommand};
use commands::index::IndexArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// entindex command-line tools.
#[derive(Parser)]
#[command(name = "entindex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign stable indices to the entities of a batch
    Index {
        /// Batch to index (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Entity kind (customer, plant, material, or any name)
        #[arg(long)]
        kind: String,

        /// Key columns, in order
        #[arg(long = "key", required = true, num_args = 1..)]
        keys: Vec<String>,

        /// Prior mapping to extend (JSON)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Only look up keys of the prior mapping, never mint new indices
        #[arg(long)]
        closed: bool,

        /// First index for an empty mapping
        #[arg(long)]
        floor: Option<i64>,

        /// Where to write the resulting mapping
        #[arg(long)]
        mapping_out: Option<PathBuf>,

        /// Where to write the focal view
        #[arg(long)]
        focal_out: Option<PathBuf>,

        /// Where to write the indexed view
        #[arg(long)]
        indexed_out: Option<PathBuf>,

        /// Where to write the filtered view
        #[arg(long)]
        filtered_out: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Standardize a batch before indexing
    Polish {
        /// Batch to polish (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the polished batch
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Display batch schema and a preview
    Inspect {
        /// Batch to inspect (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of preview rows
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
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
        Commands::Index {
            input,
            kind,
            keys,
            mapping,
            closed,
            floor,
            mapping_out,
            focal_out,
            indexed_out,
            filtered_out,
            format,
        } => {
            let args = IndexArgs {
                input,
                kind,
                keys,
                mapping,
                allow_new: !closed,
                floor,
                mapping_out,
                focal_out,
                indexed_out,
                filtered_out,
            };
            let report = commands::index::run(&args)?;
            commands::index::print_report(&report, &format)?;
        }
        Commands::Polish { input, output } => {
            commands::polish::run(&input, &output)?;
        }
        Commands::Inspect {
            input,
            rows,
            format,
        } => {
            commands::inspect::run(&input, rows, &format)?;
        }
        Commands::Version => {
            println!("entindex CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("entindex core v{}", entindex_core::VERSION);
        }
    }

    Ok(())
}
