//! Record matching, field diffing and result aggregation.
//!
//! - [`Comparator`]: main entry point, parses two documents and compares them
//! - [`match_records`]: greedy pairing of two record sequences
//! - [`diff_records`]: field-level differences of one pair
//! - [`summarize`]: counts and result assembly
//!
//! ## Matching Algorithm
//!
//! Records of the first document are visited in order. Each one scans the
//! unclaimed records of the second document, also in order, and pairs with
//! the **first** candidate whose differences do not touch any configured
//! comparison field. There is no search for a globally best assignment: the
//! intended inputs are near-identical datasets with few insertions and
//! deletions, where first-fit pairing is close to optimal and costs O(n·m).
//!
//! When no comparison fields are configured the compatibility test is always
//! satisfied, so each record pairs with the first unclaimed candidate and
//! carries its full-tree differences.
//!
//! ## Diffing
//!
//! - **Field-subset mode**: each configured dotted path is resolved on both
//!   records and the resolved values are compared.
//! - **Full-tree mode**: both records are walked together; object keys are
//!   united (first record's keys first), arrays are compared as a whole.
//!
//! ## Example
//!
//! ```rust
//! use json_reconcile::{ComparisonConfig, Comparator};
//!
//! let config = ComparisonConfig::new().with_fields(["id"]);
//! let result = Comparator::new(config)
//!     .compare_documents(r#"[{"id": 1}, {"id": 2}]"#, r#"[{"id": 2}]"#)
//!     .unwrap();
//!
//! assert_eq!(result.summary.matching_objects, 1);
//! assert_eq!(result.summary.only_in_first_count, 1);
//! ```

pub mod diff;
pub mod engine;
pub mod summary;

pub use diff::{diff_records, resolve_path, values_equal};
pub use engine::{compare, match_records, Comparator, MatchOutcome, MatchedPair};
pub use summary::summarize;
