//! HMDB metabolite extraction
//!
//! Streams `<metabolite>` records out of the HMDB metabolite dump
//! (`hmdb_metabolites.xml`, optionally gzipped) without loading it.
//!
//! # Example
//! ```no_run
//! use hmdb_ingest::metabolite::MetaboliteParser;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let parser = MetaboliteParser::with_limit(100);
//! for record in parser.parse_file(Path::new("hmdb_metabolites.xml"))? {
//!     let record = record?;
//!     tracing::info!(accession = %record.accession, name = %record.name, "metabolite");
//! }
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod parser;

pub use models::MetaboliteRecord;
pub use parser::{MetaboliteParser, MetaboliteRecords};
