//! Error types for HMDB extraction
//!
//! Each extractor has its own failure type; [`IngestError`] is what the
//! adapter surfaces to callers.

use thiserror::Error;

// ============================================================================
// Extractor Errors
// ============================================================================

/// Fatal failure while reading an XML source document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Document ended with {open} unclosed element(s), innermost <{innermost}>")]
    UnexpectedEof { open: usize, innermost: String },

    #[error("Malformed XML document: {0}")]
    Document(#[from] roxmltree::Error),
}

/// A protein element lacks a required child
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Protein element at line {line}, column {column} is missing required field '{field}'")]
pub struct MissingFieldError {
    pub field: &'static str,
    pub line: u32,
    pub column: u32,
}

/// Recoverable failure while scraping a single reaction page
#[derive(Debug, Error)]
pub enum ScrapeFailure {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No reaction panel on page")]
    MissingPanel,

    #[error("Reaction panel has no status text")]
    MissingStatus,

    #[error("Reaction panel has no enzyme link")]
    MissingEnzyme,

    #[error("Reaction panel has no equation heading")]
    MissingEquation,

    #[error("Unparseable reaction equation: {0:?}")]
    InvalidEquation(String),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

// ============================================================================
// Adapter Errors
// ============================================================================

/// Errors surfaced by the adapter facade
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to parse metabolite source: {0}")]
    Metabolite(#[source] ParseError),

    #[error("Failed to parse protein source: {0}")]
    Protein(#[source] ParseError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] ScrapeFailure),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
