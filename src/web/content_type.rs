use std::path::Path;

use crate::report::ReportFormat;

/// Base name used for downloaded reports
pub const REPORT_BASE_NAME: &str = "comparison-result";

/// Infer a MIME type from a filename's extension
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("html") => "text/html",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Download name for a report in the given format
#[must_use]
pub fn report_file_name(format: ReportFormat) -> String {
    format!("{REPORT_BASE_NAME}.{}", format.extension())
}
