//! Web server for browser-based comparisons.
//!
//! Users upload or paste two JSON documents, choose the fields to compare,
//! and get the result back as JSON or as a downloadable report.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! json-reconcile serve
//!
//! # Custom port and auto-open browser
//! json-reconcile serve --port 3000 --open
//!
//! # Bind to all interfaces
//! json-reconcile serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with the comparison form
//! - `POST /api/compare` - Compare two documents, returns the result as JSON
//! - `POST /api/report` - Compare two documents, returns a report download
//!
//! Both `POST` endpoints take a multipart form with the documents in `first`
//! and `second` (file uploads) or `first_text` and `second_text` (pasted).
//! Settings come from an optional `config` JSON document, overridden by the
//! `comparison_fields`, `case_sensitive`, `ignore_array_order`,
//! `ignore_extra_fields` and `output_format` fields.

pub mod content_type;
pub mod server;
