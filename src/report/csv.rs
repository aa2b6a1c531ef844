use std::fmt::Write;

use crate::core::types::{ComparisonResult, FieldDifference};

const HEADER: [&str; 7] = [
    "category",
    "field_path",
    "value_in_first",
    "value_in_second",
    "missing_in",
    "record_in_first",
    "record_in_second",
];

/// Render a CSV report.
///
/// Each field difference is a `difference` row carrying both records; each
/// unmatched record is an `only_in_first` or `only_in_second` row. Absent
/// values are empty cells, and `missing_in` names the side lacking the field
/// so an absent value reads apart from a null one.
///
/// # Errors
///
/// Returns `std::fmt::Error` if writing to the buffer fails.
pub fn render(result: &ComparisonResult) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_row(&mut out, &HEADER)?;

    for detail in &result.differences {
        let first = detail.object_from_first.to_string();
        let second = detail.object_from_second.to_string();
        for diff in &detail.field_differences {
            write_row(
                &mut out,
                &[
                    "difference",
                    &diff.field_path,
                    diff.value_in_first.as_deref().unwrap_or_default(),
                    diff.value_in_second.as_deref().unwrap_or_default(),
                    missing_in(diff),
                    &first,
                    &second,
                ],
            )?;
        }
    }

    for record in &result.only_in_first {
        write_row(&mut out, &["only_in_first", "", "", "", "", &record.to_string(), ""])?;
    }
    for record in &result.only_in_second {
        write_row(&mut out, &["only_in_second", "", "", "", "", "", &record.to_string()])?;
    }

    Ok(out)
}

fn missing_in(diff: &FieldDifference) -> &'static str {
    if diff.is_missing_in_first() {
        "first"
    } else if diff.is_missing_in_second() {
        "second"
    } else {
        ""
    }
}

fn write_row(out: &mut String, cells: &[&str]) -> std::fmt::Result {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, "{}", escape(cell))?;
    }
    out.push_str("\r\n");
    Ok(())
}

/// Quote a cell when it holds a delimiter, quote or line break
fn escape(cell: &str) -> std::borrow::Cow<'_, str> {
    if cell.contains([',', '"', '\r', '\n']) {
        std::borrow::Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        std::borrow::Cow::Borrowed(cell)
    }
}
