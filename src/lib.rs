//! # json-reconcile
//!
//! A library for reconciling two JSON documents that each hold an array of
//! records.
//!
//! Exports from two systems, or two snapshots of one system, rarely line up
//! record for record. `json-reconcile` pairs records across the two documents,
//! reports field-level differences for each pair, and lists the records that
//! exist on only one side.
//!
//! ## Features
//!
//! - **Field-subset matching**: Pair records on a set of dotted key paths
//! - **Full-tree comparison**: Compare every field recursively when no subset is given
//! - **Case-insensitive values**: Optional case folding for value comparison
//! - **Reports**: Text, JSON, CSV and standalone HTML
//!
//! ## Example
//!
//! ```rust
//! use json_reconcile::{ComparisonConfig, Comparator};
//!
//! let first = r#"[{"id": 1, "name": "Ada"}, {"id": 2, "name": "Alan"}]"#;
//! let second = r#"[{"id": 2, "name": "Alan"}, {"id": 3, "name": "Grace"}]"#;
//!
//! let comparator = Comparator::new(ComparisonConfig::default().with_fields(["id"]));
//! let result = comparator.compare_documents(first, second).unwrap();
//!
//! assert_eq!(result.summary.matching_objects, 1);
//! assert_eq!(result.summary.only_in_first_count, 1);
//! assert_eq!(result.summary.only_in_second_count, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Value model, configuration and result types
//! - [`matching`]: Record differ and greedy matcher
//! - [`parsing`]: JSON document loading
//! - [`report`]: Text, JSON, CSV and HTML renderers
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based comparisons

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod report;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::config::{ComparisonConfig, OutputFormat};
pub use crate::core::types::*;
pub use crate::core::value::StructuredValue;
pub use crate::matching::engine::{compare, Comparator};
