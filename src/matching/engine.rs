use crate::core::config::ComparisonConfig;
use crate::core::types::{ComparisonError, ComparisonResult, FieldDifference, InputSide};
use crate::core::value::StructuredValue;
use crate::matching::diff::diff_records;
use crate::matching::summary::summarize;
use crate::parsing::json;

/// A record from the first sequence paired with one from the second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub first_index: usize,
    pub second_index: usize,
    /// Differences reported for the pair; empty when the records match
    pub differences: Vec<FieldDifference>,
}

/// Pairing produced by [`match_records`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Pairs in the iteration order of the first sequence
    pub pairs: Vec<MatchedPair>,
    /// Unpaired indices of the first sequence, ascending
    pub unmatched_first: Vec<usize>,
    /// Unpaired indices of the second sequence, ascending
    pub unmatched_second: Vec<usize>,
}

/// Pair records greedily, first compatible candidate wins.
///
/// Each record of `first` scans the unclaimed records of `second` in order
/// and takes the first candidate whose differences touch none of the
/// configured comparison fields. A claimed record is never offered again.
///
/// With no comparison fields configured no difference can touch the field
/// list, so every record simply takes the first unclaimed candidate.
#[must_use]
pub fn match_records(
    first: &[StructuredValue],
    second: &[StructuredValue],
    config: &ComparisonConfig,
) -> MatchOutcome {
    let mut claimed = vec![false; second.len()];
    let mut outcome = MatchOutcome::default();

    for (first_index, record) in first.iter().enumerate() {
        let candidate = second
            .iter()
            .enumerate()
            .filter(|(second_index, _)| !claimed[*second_index])
            .find_map(|(second_index, candidate)| {
                let differences = diff_records(record, candidate, config);
                is_compatible(&differences, config).then_some((second_index, differences))
            });

        match candidate {
            Some((second_index, differences)) => {
                claimed[second_index] = true;
                outcome.pairs.push(MatchedPair {
                    first_index,
                    second_index,
                    differences,
                });
            }
            None => outcome.unmatched_first.push(first_index),
        }
    }

    outcome.unmatched_second = claimed
        .iter()
        .enumerate()
        .filter_map(|(index, &is_claimed)| (!is_claimed).then_some(index))
        .collect();

    outcome
}

fn is_compatible(differences: &[FieldDifference], config: &ComparisonConfig) -> bool {
    differences.is_empty()
        || !differences
            .iter()
            .any(|d| config.comparison_fields.contains(&d.field_path))
}

/// The comparison engine
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    config: ComparisonConfig,
}

impl Comparator {
    #[must_use]
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    /// Parse two documents and compare their records
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::MalformedInput` naming the first document
    /// that is not a JSON array. No partial result is produced.
    pub fn compare_documents(
        &self,
        first: &str,
        second: &str,
    ) -> Result<ComparisonResult, ComparisonError> {
        let first = json::parse(first).map_err(|source| ComparisonError::MalformedInput {
            input: InputSide::First,
            source,
        })?;
        let second = json::parse(second).map_err(|source| ComparisonError::MalformedInput {
            input: InputSide::Second,
            source,
        })?;

        Ok(self.compare_records(first, second))
    }

    /// Compare two already parsed sequences
    #[must_use]
    pub fn compare_records(
        &self,
        first: Vec<StructuredValue>,
        second: Vec<StructuredValue>,
    ) -> ComparisonResult {
        let outcome = match_records(&first, &second, &self.config);
        summarize(first, second, outcome, &self.config)
    }
}

/// Compare two documents with the given configuration
///
/// # Errors
///
/// See [`Comparator::compare_documents`].
pub fn compare(
    first: &str,
    second: &str,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, ComparisonError> {
    Comparator::new(config.clone()).compare_documents(first, second)
}
