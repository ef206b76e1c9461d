//! HMDB protein extraction
//!
//! The protein dump is small enough to load whole; records are read with a
//! tree walk over the parsed document.

pub mod models;
pub mod parser;

pub use models::ProteinRecord;
pub use parser::{ProteinDocument, ProteinRecords, HMDB_NAMESPACE};
