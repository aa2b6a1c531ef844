//! Command-line interface for json-reconcile.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **compare**: Compare two JSON documents and print or save a report
//! - **serve**: Start the interactive web interface
//!
//! ## Usage
//!
//! ```text
//! # Compare every field of every record
//! json-reconcile compare before.json after.json
//!
//! # Pair records on a key and report in CSV
//! json-reconcile compare before.json after.json.gz --fields id,address.city --format csv
//!
//! # Read one side from a pipe
//! curl -s https://example.com/export | json-reconcile compare - snapshot.json
//!
//! # Start web UI
//! json-reconcile serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};

use crate::report::ReportFormat;

pub mod compare;

#[derive(Parser)]
#[command(name = "json-reconcile")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Compare two JSON arrays of records and report the differences")]
#[command(
    long_about = "json-reconcile pairs records from two JSON documents and reports what changed.\n\nRecords are paired greedily in document order. With --fields, records pair when the listed fields agree; without it, records pair only when every field agrees. The report lists:\n- Records present in only one document\n- Per-field differences between paired records\n- Summary counts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format [default: text, or the config file's output format]
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two JSON documents
    Compare(compare::CompareArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    Html,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Html => Self::Html,
        }
    }
}
