use chrono::Utc;

use crate::core::config::ComparisonConfig;
use crate::core::types::{ComparisonResult, ComparisonSummary, DifferenceDetail};
use crate::core::value::StructuredValue;
use crate::matching::engine::MatchOutcome;

/// Assemble the final result from a pairing.
///
/// Records are moved out of the input sequences: each one belongs to exactly
/// one outcome, so nothing is cloned. Fully matching pairs are only counted.
#[must_use]
pub fn summarize(
    first: Vec<StructuredValue>,
    second: Vec<StructuredValue>,
    outcome: MatchOutcome,
    config: &ComparisonConfig,
) -> ComparisonResult {
    let mut summary = ComparisonSummary {
        total_objects_in_first: first.len(),
        total_objects_in_second: second.len(),
        compared_fields: config.comparison_fields.clone(),
        ..ComparisonSummary::default()
    };

    let mut first: Vec<Option<StructuredValue>> = first.into_iter().map(Some).collect();
    let mut second: Vec<Option<StructuredValue>> = second.into_iter().map(Some).collect();

    let mut differences = Vec::new();
    for pair in outcome.pairs {
        if pair.differences.is_empty() {
            summary.matching_objects += 1;
            continue;
        }

        if let (Some(object_from_first), Some(object_from_second)) = (
            first[pair.first_index].take(),
            second[pair.second_index].take(),
        ) {
            summary.objects_with_differences += 1;
            differences.push(DifferenceDetail {
                object_from_first,
                object_from_second,
                field_differences: pair.differences,
            });
        }
    }

    let only_in_first: Vec<StructuredValue> = outcome
        .unmatched_first
        .iter()
        .filter_map(|&index| first[index].take())
        .collect();
    let only_in_second: Vec<StructuredValue> = outcome
        .unmatched_second
        .iter()
        .filter_map(|&index| second[index].take())
        .collect();

    summary.only_in_first_count = only_in_first.len();
    summary.only_in_second_count = only_in_second.len();

    ComparisonResult {
        only_in_first,
        only_in_second,
        differences,
        summary,
        comparison_timestamp: Utc::now(),
    }
}
