//! Core data types for record comparison.
//!
//! - [`StructuredValue`]: a parsed JSON value with document key order preserved
//! - [`ComparisonConfig`]: which fields to compare and how
//! - [`FieldDifference`], [`DifferenceDetail`]: per-field and per-pair differences
//! - [`ComparisonSummary`], [`ComparisonResult`]: the aggregated outcome
//!
//! ## Rendering
//!
//! Values are compared through their canonical text:
//!
//! | Value | Rendered as |
//! |-------|-------------|
//! | `"Bob"` | `Bob` |
//! | `42`, `1.0` | `42`, `1.0` (literal text kept) |
//! | `true`, `false` | `True`, `False` |
//! | `null` | empty string |
//! | `[1,null]`, `{"a":true}` | compact JSON, literals unchanged |

pub mod config;
pub mod types;
pub mod value;

pub use config::{ComparisonConfig, OutputFormat};
pub use types::{
    ComparisonError, ComparisonResult, ComparisonSummary, DifferenceDetail, FieldDifference,
    InputSide,
};
pub use value::{StructuredValue, ValueKind};
