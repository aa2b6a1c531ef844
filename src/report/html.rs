use std::fmt::Write;

use crate::core::types::ComparisonResult;
use crate::core::value::StructuredValue;
use crate::report::display_path;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:2em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#f0f0f0}\
td.absent{color:#999;font-style:italic}\
pre{margin:0;white-space:pre-wrap;word-break:break-all}";

/// Render a standalone HTML report
///
/// # Errors
///
/// Returns `std::fmt::Error` if writing to the buffer fails.
pub fn render(result: &ComparisonResult) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let summary = &result.summary;

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Comparison Results</title>\n<style>{STYLE}</style>\n</head>\n<body>")?;
    writeln!(out, "<h1>Comparison Results</h1>")?;
    writeln!(
        out,
        "<p>Generated {}</p>",
        escape(&result.comparison_timestamp.to_rfc3339())
    )?;

    let compared = if summary.compared_fields.is_empty() {
        "all fields".to_string()
    } else {
        summary.compared_fields.join(", ")
    };

    writeln!(out, "<h2>Summary</h2>\n<table>")?;
    for (label, value) in [
        ("Records in first", summary.total_objects_in_first.to_string()),
        ("Records in second", summary.total_objects_in_second.to_string()),
        ("Matching", summary.matching_objects.to_string()),
        ("With differences", summary.objects_with_differences.to_string()),
        ("Only in first", summary.only_in_first_count.to_string()),
        ("Only in second", summary.only_in_second_count.to_string()),
        ("Compared fields", compared),
    ] {
        writeln!(out, "<tr><th>{label}</th><td>{}</td></tr>", escape(&value))?;
    }
    writeln!(out, "</table>")?;

    if !result.differences.is_empty() {
        writeln!(out, "<h2>Differences ({})</h2>", result.differences.len())?;
        writeln!(
            out,
            "<table>\n<tr><th>#</th><th>Field</th><th>First</th><th>Second</th></tr>"
        )?;
        for (i, detail) in result.differences.iter().enumerate() {
            for diff in &detail.field_differences {
                writeln!(
                    out,
                    "<tr><td>{}</td><td>{}</td>{}{}</tr>",
                    i + 1,
                    escape(display_path(&diff.field_path)),
                    value_cell(diff.is_missing_in_first(), diff.value_in_first.as_deref()),
                    value_cell(diff.is_missing_in_second(), diff.value_in_second.as_deref()),
                )?;
            }
        }
        writeln!(out, "</table>")?;
    }

    write_records(&mut out, "Only in first", &result.only_in_first)?;
    write_records(&mut out, "Only in second", &result.only_in_second)?;

    writeln!(out, "</body>\n</html>")?;
    Ok(out)
}

fn write_records(out: &mut String, title: &str, records: &[StructuredValue]) -> std::fmt::Result {
    if records.is_empty() {
        return Ok(());
    }
    writeln!(out, "<h2>{title} ({})</h2>\n<table>", records.len())?;
    for record in records {
        writeln!(out, "<tr><td><pre>{}</pre></td></tr>", escape(&record.to_string()))?;
    }
    writeln!(out, "</table>")
}

fn value_cell(missing: bool, value: Option<&str>) -> String {
    if missing {
        return "<td class=\"absent\">absent</td>".to_string();
    }
    format!("<td><pre>{}</pre></td>", escape(value.unwrap_or_default()))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
