//! HMDB Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Extracts metabolites, proteins and metabolite-to-enzyme reaction edges
//! from the Human Metabolome Database and normalizes them into graph tuples.
//!
//! # Sources
//!
//! - **Metabolites**: streaming parse of the metabolite XML dump
//! - **Proteins**: whole-document parse of the protein XML dump
//! - **Reactions**: scraped from the public reaction pages
//!
//! # Example
//!
//! ```no_run
//! use hmdb_ingest::adapter::HmdbAdapter;
//! use hmdb_ingest::config::AdapterConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let adapter = HmdbAdapter::new(AdapterConfig::load(None)?);
//! for node in adapter.get_nodes() {
//!     let node = node?;
//!     tracing::info!(id = %node.id, label = %node.label, "node");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod fields;
pub mod metabolite;
pub mod protein;
pub mod reaction;
pub mod sink;

pub use adapter::HmdbAdapter;
pub use config::AdapterConfig;
pub use error::{IngestError, Result};
