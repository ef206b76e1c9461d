//! Whole-document parser for the HMDB protein XML dump
//!
//! Unlike the metabolite dump, the protein file is loaded and parsed in one
//! piece. Structural validity is therefore established before the first
//! record is produced, and a protein without `accession` or `gene_name` is
//! reported as an error instead of being skipped.

use flate2::read::GzDecoder;
use roxmltree::{Document, Node, NodeId, ParsingOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::models::ProteinRecord;
use crate::error::{MissingFieldError, ParseError};

/// Namespace of every element in the HMDB dumps
pub const HMDB_NAMESPACE: &str = "http://www.hmdb.ca";

/// Subtrees whose children never supply the protein's own fields
const NESTED_LISTS: [&str; 2] = ["metabolite_associations", "pathways"];

/// Raw text of a protein dump
#[derive(Debug, Clone)]
pub struct ProteinDocument {
    text: String,
}

impl ProteinDocument {
    /// Read a protein XML file into memory
    ///
    /// Files ending in `.gz` are decompressed while reading.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let io_error = |source| ParseError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut text = String::new();

        let read = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            GzDecoder::new(file).read_to_string(&mut text)
        } else {
            let mut file = file;
            file.read_to_string(&mut text)
        };
        read.map_err(io_error)?;

        info!(path = %path.display(), bytes = text.len(), "Loaded protein document");

        Ok(Self { text })
    }

    pub fn from_string(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parse the document and iterate its `<protein>` elements in order
    pub fn records(&self) -> Result<ProteinRecords<'_>, ParseError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(&self.text, options)?;

        let proteins: Vec<NodeId> = document
            .descendants()
            .filter(|node| is_hmdb(node, "protein"))
            .map(|node| node.id())
            .collect();

        debug!(count = proteins.len(), "Found protein elements");

        Ok(ProteinRecords {
            document,
            proteins: proteins.into_iter(),
        })
    }
}

/// Lazy sequence of protein records over a parsed document
pub struct ProteinRecords<'a> {
    document: Document<'a>,
    proteins: std::vec::IntoIter<NodeId>,
}

impl Iterator for ProteinRecords<'_> {
    type Item = Result<ProteinRecord, MissingFieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.proteins.next()?;
        let protein = self.document.get_node(id)?;
        Some(extract_protein(&self.document, protein))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.proteins.size_hint()
    }
}

fn extract_protein(
    document: &Document<'_>,
    protein: Node<'_, '_>,
) -> Result<ProteinRecord, MissingFieldError> {
    let required = |field: &'static str| {
        own_field(protein, field).ok_or_else(|| {
            let position = document.text_pos_at(protein.range().start);
            MissingFieldError {
                field,
                line: position.row,
                column: position.col,
            }
        })
    };

    let accession = required("accession")?;
    let gene_name = required("gene_name")?;

    let metabolites = list_values(protein, "metabolite_associations", "accession");
    let pathways = list_values(protein, "pathways", "name");

    Ok(ProteinRecord {
        accession,
        gene_name,
        metabolites,
        pathways,
    })
}

/// Text of the protein's own `field`: a direct child if present, otherwise
/// the first nested one outside the association lists
fn own_field(protein: Node<'_, '_>, field: &str) -> Option<String> {
    let direct = protein.children().find(|child| is_hmdb(child, field));
    let node = direct.or_else(|| {
        protein
            .descendants()
            .skip(1)
            .find(|node| is_hmdb(node, field) && !inside_nested_list(protein, *node))
    })?;

    element_text(node)
}

fn inside_nested_list(protein: Node<'_, '_>, node: Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .take_while(|ancestor| *ancestor != protein)
        .any(|ancestor| NESTED_LISTS.iter().any(|list| is_hmdb(&ancestor, list)))
}

/// For every child of each `list` element under the protein, the text of
/// its `field` child
fn list_values(protein: Node<'_, '_>, list: &str, field: &str) -> Vec<String> {
    protein
        .descendants()
        .filter(|node| is_hmdb(node, list))
        .flat_map(|list_node| list_node.children().filter(Node::is_element))
        .filter_map(|item| {
            let value = item
                .children()
                .find(|child| is_hmdb(child, field))
                .and_then(element_text);
            if value.is_none() {
                debug!(list, field, "List entry without value");
            }
            value
        })
        .collect()
}

fn element_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn is_hmdb(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(HMDB_NAMESPACE)
}
