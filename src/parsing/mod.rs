//! Loaders that turn input documents into sequences of records.
//!
//! Every input must be a JSON array at the top level. Elements are usually
//! objects, but any JSON value is accepted.
//!
//! ## Example
//!
//! ```rust
//! use json_reconcile::parsing::json::parse;
//!
//! let records = parse(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
//! assert_eq!(records.len(), 2);
//!
//! // A bare object is not a collection of records
//! assert!(parse(r#"{"id": 1}"#).is_err());
//! ```
//!
//! Files ending in `.gz` and gzip-compressed uploads are decompressed
//! transparently, and a leading UTF-8 byte order mark is ignored.

pub mod json;
