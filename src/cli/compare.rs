use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::config::{parse_field_list, ComparisonConfig};
use crate::matching::engine::Comparator;
use crate::parsing::json;
use crate::report::{self, ReportFormat};

#[derive(Args)]
pub struct CompareArgs {
    /// First JSON document (array of records, optionally gzipped), or - for stdin
    #[arg(required = true)]
    pub first: PathBuf,

    /// Second JSON document (array of records, optionally gzipped), or - for stdin
    #[arg(required = true)]
    pub second: PathBuf,

    /// Dotted field paths to compare; all fields are compared when omitted
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Compare values ignoring letter case
    #[arg(short = 'i', long)]
    pub case_insensitive: bool,

    /// Recorded in the result but not applied
    #[arg(long)]
    pub ignore_array_order: bool,

    /// Recorded in the result but not applied
    #[arg(long)]
    pub ignore_extra_fields: bool,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompareArgs, format: Option<OutputFormat>) -> anyhow::Result<()> {
    if is_stdin(&args.first) && is_stdin(&args.second) {
        anyhow::bail!("Only one input can be read from stdin");
    }

    let config = build_config(&args)?;

    if config.ignore_array_order {
        tracing::warn!("--ignore-array-order is recorded but arrays are still compared in order");
    }
    if config.ignore_extra_fields {
        tracing::warn!("--ignore-extra-fields is recorded but extra fields are still reported");
    }

    let first = read_input(&args.first)?;
    let second = read_input(&args.second)?;

    let report_format = match format {
        Some(format) => ReportFormat::from(format),
        None if args.config.is_some() => ReportFormat::from(config.output_format),
        None => ReportFormat::Text,
    };

    let result = Comparator::new(config).compare_documents(&first, &second)?;

    tracing::debug!(
        "First: {} records, second: {} records",
        result.summary.total_objects_in_first,
        result.summary.total_objects_in_second
    );
    tracing::debug!(
        "{} matching, {} with differences, {} only in first, {} only in second",
        result.summary.matching_objects,
        result.summary.objects_with_differences,
        result.summary.only_in_first_count,
        result.summary.only_in_second_count
    );

    let rendered = report::render(&result, report_format)?;

    match &args.output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

/// Merge the optional config file with command-line flags.
///
/// `--fields` replaces the file's field list; boolean flags can only switch
/// options on.
fn build_config(args: &CompareArgs) -> anyhow::Result<ComparisonConfig> {
    let mut config = match &args.config {
        Some(path) => ComparisonConfig::load_from_file(path)?,
        None => ComparisonConfig::default(),
    };

    if !args.fields.is_empty() {
        config.comparison_fields = parse_field_list(&args.fields.join(","));
    }
    if args.case_insensitive {
        config.case_sensitive = false;
    }
    config.ignore_array_order |= args.ignore_array_order;
    config.ignore_extra_fields |= args.ignore_extra_fields;

    Ok(config)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if is_stdin(path) {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return json::decode_upload(&bytes, usize::MAX).context("Failed to decode stdin");
    }

    json::read_document(path).with_context(|| format!("Failed to read {}", path.display()))
}
