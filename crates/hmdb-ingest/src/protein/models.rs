//! Protein data models

use serde::{Deserialize, Serialize};

/// One `<protein>` element from the HMDB protein dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinRecord {
    /// HMDB protein accession (e.g., "HMDBP00001")
    pub accession: String,
    /// Gene symbol, used as the display name
    pub gene_name: String,
    /// Metabolite accessions from `<metabolite_associations>`, in order
    pub metabolites: Vec<String>,
    /// Pathway names from `<pathways>`, in order
    pub pathways: Vec<String>,
}
