use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::value::StructuredValue;
use crate::parsing::json::ParseError;

/// Which of the two documents an error or record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSide {
    First,
    Second,
}

impl std::fmt::Display for InputSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Malformed {input} input: {source}")]
    MalformedInput {
        input: InputSide,
        #[source]
        source: ParseError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// A single field that differs between two paired records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDifference {
    /// Dotted path of the differing node; empty for the record root
    pub field_path: String,

    /// Rendered value in the first record, `None` when the field is absent
    pub value_in_first: Option<String>,

    /// Rendered value in the second record, `None` when the field is absent
    pub value_in_second: Option<String>,
}

impl FieldDifference {
    pub fn new(
        field_path: impl Into<String>,
        value_in_first: Option<String>,
        value_in_second: Option<String>,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            value_in_first,
            value_in_second,
        }
    }

    #[must_use]
    pub fn is_missing_in_first(&self) -> bool {
        self.value_in_first.is_none()
    }

    #[must_use]
    pub fn is_missing_in_second(&self) -> bool {
        self.value_in_second.is_none()
    }
}

/// A matched pair of records that is not identical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceDetail {
    pub object_from_first: StructuredValue,
    pub object_from_second: StructuredValue,
    pub field_differences: Vec<FieldDifference>,
}

/// Counts derived from a comparison run.
///
/// Every record lands in exactly one bucket, so
/// `total_objects_in_first == matching_objects + objects_with_differences + only_in_first_count`
/// and likewise for the second document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_objects_in_first: usize,
    pub total_objects_in_second: usize,
    pub matching_objects: usize,
    pub only_in_first_count: usize,
    pub only_in_second_count: usize,
    pub objects_with_differences: usize,
    pub compared_fields: Vec<String>,
}

impl ComparisonSummary {
    /// True when every record paired up without differences
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.objects_with_differences == 0
            && self.only_in_first_count == 0
            && self.only_in_second_count == 0
    }
}

/// Outcome of comparing two documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub only_in_first: Vec<StructuredValue>,
    pub only_in_second: Vec<StructuredValue>,
    pub differences: Vec<DifferenceDetail>,
    pub summary: ComparisonSummary,
    pub comparison_timestamp: DateTime<Utc>,
}
