use crate::core::config::ComparisonConfig;
use crate::core::types::FieldDifference;
use crate::core::value::StructuredValue;

/// Compute the field-level differences between two records.
///
/// With configured comparison fields only those paths are compared, in
/// configuration order. Without them both trees are walked in full.
#[must_use]
pub fn diff_records(
    first: &StructuredValue,
    second: &StructuredValue,
    config: &ComparisonConfig,
) -> Vec<FieldDifference> {
    let mut differences = Vec::new();

    if config.comparison_fields.is_empty() {
        diff_tree(first, second, "", config.case_sensitive, &mut differences);
    } else {
        for path in &config.comparison_fields {
            let value_first = resolve_path(first, path);
            let value_second = resolve_path(second, path);

            if !values_equal(value_first, value_second, config.case_sensitive) {
                differences.push(FieldDifference::new(
                    path.as_str(),
                    value_first.map(render),
                    value_second.map(render),
                ));
            }
        }
    }

    differences
}

/// Resolve a dotted path by descending object keys.
///
/// Array indexing is not supported. A missing key or a non-object along the
/// way resolves to `None`.
#[must_use]
pub fn resolve_path<'a>(value: &'a StructuredValue, path: &str) -> Option<&'a StructuredValue> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Equality on canonical renderings. Two absent values are equal.
#[must_use]
pub fn values_equal(
    first: Option<&StructuredValue>,
    second: Option<&StructuredValue>,
    case_sensitive: bool,
) -> bool {
    match (first, second) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            let (a, b) = (a.rendered(), b.rendered());
            if case_sensitive {
                a == b
            } else {
                eq_ignore_case(&a, &b)
            }
        }
        _ => false,
    }
}

/// Char-by-char comparison under simple upper-case folding
fn eq_ignore_case(a: &str, b: &str) -> bool {
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y || x.to_uppercase().eq(y.to_uppercase()) => {}
            _ => return false,
        }
    }
}

fn diff_tree(
    first: &StructuredValue,
    second: &StructuredValue,
    path: &str,
    case_sensitive: bool,
    differences: &mut Vec<FieldDifference>,
) {
    if first.kind() != second.kind() {
        differences.push(FieldDifference::new(
            path,
            Some(render(first)),
            Some(render(second)),
        ));
        return;
    }

    match (first, second) {
        (StructuredValue::Object(a), StructuredValue::Object(b)) => {
            for (key, value_first) in a {
                let child = join_path(path, key);
                match b.get(key) {
                    Some(value_second) => {
                        diff_tree(value_first, value_second, &child, case_sensitive, differences);
                    }
                    None => differences.push(FieldDifference::new(
                        child,
                        Some(render(value_first)),
                        None,
                    )),
                }
            }

            for (key, value_second) in b.iter().filter(|(key, _)| !a.contains_key(*key)) {
                differences.push(FieldDifference::new(
                    join_path(path, key),
                    None,
                    Some(render(value_second)),
                ));
            }
        }
        // Scalars and arrays are leaves; arrays compare by their rendered text
        _ => {
            if !values_equal(Some(first), Some(second), case_sensitive) {
                differences.push(FieldDifference::new(
                    path,
                    Some(render(first)),
                    Some(render(second)),
                ));
            }
        }
    }
}

fn render(value: &StructuredValue) -> String {
    value.rendered().into_owned()
}

fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}
