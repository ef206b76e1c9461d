//! Metabolite data models

use serde::{Deserialize, Serialize};

/// One `<metabolite>` element from the HMDB metabolite dump
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaboliteRecord {
    /// Primary HMDB accession (e.g., "HMDB0000122"), never empty
    pub accession: String,
    /// Primary display name (never a pathway name)
    pub name: String,
    /// KEGG compound id, empty when absent
    pub kegg_id: String,
    /// PubChem compound id, empty when absent
    pub pubchem_compound_id: String,
    /// ChEBI id, empty when absent
    pub chebi_id: String,
    /// InChI string, empty when absent
    pub inchi: String,
    /// Associated HMDB protein accessions in document order, duplicates kept
    pub protein_accession: Vec<String>,
    /// Pathway names in document order
    pub pathways: Vec<String>,
}
