//! Renderers that turn a [`ComparisonResult`] into a downloadable report.
//!
//! Renderers only read the structured result (field paths, rendered values,
//! ordered record lists); they never re-run any comparison logic.
//!
//! | Format | Content |
//! |--------|---------|
//! | text | Human-readable summary and per-pair differences |
//! | json | The full result, pretty-printed |
//! | csv  | One row per field difference and per unmatched record |
//! | html | Standalone page with summary and tables |

use thiserror::Error;

use crate::core::config::OutputFormat;
use crate::core::types::ComparisonResult;

pub mod csv;
pub mod html;
pub mod text;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format report")]
    Format(#[from] std::fmt::Error),
}

/// Every format a report can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Html,
}

impl ReportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Html => Self::Html,
        }
    }
}

/// Render a comparison result
///
/// # Errors
///
/// Returns `ReportError` if serialization or formatting fails.
pub fn render(result: &ComparisonResult, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(text::render(result)?),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        ReportFormat::Csv => Ok(csv::render(result)?),
        ReportFormat::Html => Ok(html::render(result)?),
    }
}

/// Display form of a field path; the record root has an empty path
pub(crate) fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}
