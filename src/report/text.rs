use std::fmt::Write;

use crate::core::types::{ComparisonResult, ComparisonSummary};
use crate::report::display_path;

/// Longest record rendering shown before truncation
const MAX_RECORD_WIDTH: usize = 100;

const ABSENT: &str = "<absent>";

/// Render a plain-text report
///
/// # Errors
///
/// Returns `std::fmt::Error` if writing to the buffer fails.
pub fn render(result: &ComparisonResult) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Comparison Results")?;
    writeln!(out, "{}", "=".repeat(60))?;
    write_summary(&mut out, &result.summary)?;

    if result.summary.is_reconciled() {
        writeln!(out, "\nAll records match.")?;
        return Ok(out);
    }

    if !result.differences.is_empty() {
        writeln!(out, "\nDifferences ({}):", result.differences.len())?;
        for (i, detail) in result.differences.iter().enumerate() {
            writeln!(out, "\n  [{}] first:  {}", i + 1, truncate(&detail.object_from_first.to_string()))?;
            writeln!(out, "      second: {}", truncate(&detail.object_from_second.to_string()))?;
            for diff in &detail.field_differences {
                let first = if diff.is_missing_in_first() {
                    ABSENT
                } else {
                    diff.value_in_first.as_deref().unwrap_or_default()
                };
                let second = if diff.is_missing_in_second() {
                    ABSENT
                } else {
                    diff.value_in_second.as_deref().unwrap_or_default()
                };
                writeln!(
                    out,
                    "      {}: {} -> {}",
                    display_path(&diff.field_path),
                    first,
                    second,
                )?;
            }
        }
    }

    for (title, records) in [
        ("Only in first", &result.only_in_first),
        ("Only in second", &result.only_in_second),
    ] {
        if records.is_empty() {
            continue;
        }
        writeln!(out, "\n{title} ({}):", records.len())?;
        for record in records {
            writeln!(out, "  {}", truncate(&record.to_string()))?;
        }
    }

    Ok(out)
}

fn write_summary(out: &mut String, summary: &ComparisonSummary) -> std::fmt::Result {
    let compared = if summary.compared_fields.is_empty() {
        "all fields".to_string()
    } else {
        summary.compared_fields.join(", ")
    };

    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Records in first:   {}", summary.total_objects_in_first)?;
    writeln!(out, "  Records in second:  {}", summary.total_objects_in_second)?;
    writeln!(out, "  Matching:           {}", summary.matching_objects)?;
    writeln!(out, "  With differences:   {}", summary.objects_with_differences)?;
    writeln!(out, "  Only in first:      {}", summary.only_in_first_count)?;
    writeln!(out, "  Only in second:     {}", summary.only_in_second_count)?;
    writeln!(out, "  Compared fields:    {compared}")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_RECORD_WIDTH {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_RECORD_WIDTH).collect();
        format!("{head}...")
    }
}
