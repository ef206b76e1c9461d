//! HMDB Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the HMDB ingest workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`HmdbError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by every binary
//! - **Types**: the node and edge tuples handed to graph writers
//!
//! # Example
//!
//! ```no_run
//! use hmdb_common::types::{AttributeValue, Attributes, NodeTuple};
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("kegg_id".into(), AttributeValue::Text("C00031".into()));
//!
//! let node = NodeTuple::new("HMDB0000122", "metabolite", "D-Glucose", attributes);
//! assert_eq!(node.id, "HMDB0000122");
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HmdbError, Result};
