//! Adapter facade over the three HMDB extractors
//!
//! [`HmdbAdapter`] turns metabolite and protein records into [`NodeTuple`]s
//! and scraped reaction edges into [`EdgeTuple`]s, keeping only the node
//! types, edge types and attribute fields selected in [`AdapterConfig`].

use hmdb_common::types::{AttributeValue, Attributes, EdgeTuple, NodeTuple};
use std::io::BufRead;
use tracing::{info, warn};

use crate::config::AdapterConfig;
use crate::error::{IngestError, MissingFieldError, Result};
use crate::fields::{is_selected, EdgeField, EdgeType, MetaboliteField, NodeType, ProteinField};
use crate::metabolite::{MetaboliteParser, MetaboliteRecord, MetaboliteRecords};
use crate::protein::{ProteinDocument, ProteinRecord};
use crate::reaction::{HttpFetcher, PageFetcher, ReactionEdge, ReactionEdges, ReactionScraper};

/// Data source name
pub const DATA_SOURCE: &str = "HMDB";

/// Data source release
pub const DATA_VERSION: &str = "v5.0";

/// Data source licence (not published by the source)
pub const DATA_LICENCE: Option<&str> = None;

/// Facade producing graph tuples from the HMDB sources
#[derive(Debug, Clone, Default)]
pub struct HmdbAdapter {
    config: AdapterConfig,
}

impl HmdbAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn data_source(&self) -> &'static str {
        DATA_SOURCE
    }

    pub fn data_version(&self) -> &'static str {
        DATA_VERSION
    }

    pub fn data_licence(&self) -> Option<&'static str> {
        DATA_LICENCE
    }

    /// Stream metabolite nodes followed by protein nodes
    ///
    /// Sources are opened lazily, in order. The first fatal error is yielded
    /// as an item and ends the stream.
    pub fn get_nodes(&self) -> NodeStream<'_> {
        info!(
            node_types = ?self.config.node_types,
            test_mode = self.config.test_mode,
            "Reading HMDB nodes"
        );
        NodeStream {
            adapter: self,
            stage: Stage::Start,
        }
    }

    /// Scrape reaction edges over HTTP
    pub fn get_edges(&self) -> Result<EdgeStream<HttpFetcher>> {
        let reactions = &self.config.reactions;
        let fetcher = HttpFetcher::new(reactions.timeout(), &reactions.user_agent)
            .map_err(IngestError::HttpClient)?;
        Ok(self.edges_with(fetcher))
    }

    /// Scrape reaction edges with a caller-supplied page fetcher
    pub fn edges_with<F: PageFetcher>(&self, fetcher: F) -> EdgeStream<F> {
        let selected = is_selected(
            self.config.edge_types.as_deref(),
            &EdgeType::MetaboliteToProtein,
        );

        let edges = if selected {
            let reactions = &self.config.reactions;
            info!(
                reaction_ids = ?reactions.reaction_ids(),
                url_template = %reactions.url_template,
                "Reading HMDB reaction edges"
            );
            Some(
                ReactionScraper::new(fetcher, &reactions.url_template, reactions.reaction_ids())
                    .edges(),
            )
        } else {
            info!("Edge type metabolite_to_protein not selected; no edges");
            None
        };

        EdgeStream {
            edges,
            edge_fields: self.config.edge_fields.clone(),
        }
    }

    fn metabolite_parser(&self) -> MetaboliteParser {
        match self.config.metabolite_limit() {
            Some(limit) => MetaboliteParser::with_limit(limit),
            None => MetaboliteParser::new(),
        }
    }

    fn node_selected(&self, node_type: NodeType) -> bool {
        is_selected(self.config.node_types.as_deref(), &node_type)
    }

    /// Open the metabolite source, or `None` when the type is deselected
    fn open_metabolites(&self) -> Result<Option<MetaboliteRecords<Box<dyn BufRead + Send>>>> {
        if !self.node_selected(NodeType::Metabolite) {
            return Ok(None);
        }

        self.metabolite_parser()
            .parse_file(self.config.metabolite_source())
            .map(Some)
            .map_err(IngestError::Metabolite)
    }

    /// Load every protein record up to and including the first invalid one
    fn load_proteins(&self) -> Result<Vec<std::result::Result<ProteinRecord, MissingFieldError>>> {
        if !self.node_selected(NodeType::Protein) {
            return Ok(Vec::new());
        }

        let document =
            ProteinDocument::from_path(&self.config.sources.proteins).map_err(IngestError::Protein)?;
        let records = document.records().map_err(IngestError::Protein)?;

        let mut loaded = Vec::with_capacity(records.size_hint().0);
        for record in records {
            let failed = record.is_err();
            loaded.push(record);
            if failed {
                break;
            }
        }

        Ok(loaded)
    }

    /// Node tuple for one metabolite record
    pub fn metabolite_node(&self, record: MetaboliteRecord) -> NodeTuple {
        let selection = self.config.metabolite_fields.as_deref();
        let MetaboliteRecord {
            accession,
            name,
            kegg_id,
            pubchem_compound_id,
            chebi_id,
            inchi,
            protein_accession,
            pathways,
        } = record;

        let mut attributes = Attributes::new();
        let mut insert = |field: MetaboliteField, value: AttributeValue| {
            if is_selected(selection, &field) {
                attributes.insert(field.as_str().to_string(), value);
            }
        };

        insert(MetaboliteField::Name, name.clone().into());
        insert(MetaboliteField::KeggId, kegg_id.into());
        insert(MetaboliteField::ChebiId, chebi_id.into());
        insert(MetaboliteField::PubchemCompoundId, pubchem_compound_id.into());
        insert(MetaboliteField::Inchi, inchi.into());
        insert(MetaboliteField::ProteinAccession, protein_accession.into());
        insert(MetaboliteField::Pathways, pathways.into());

        NodeTuple::new(accession, NodeType::Metabolite.as_str(), name, attributes)
    }

    /// Node tuple for one protein record
    pub fn protein_node(&self, record: ProteinRecord) -> NodeTuple {
        let selection = self.config.protein_fields.as_deref();
        let mut attributes = Attributes::new();

        if is_selected(selection, &ProteinField::Metabolites) {
            attributes.insert(
                ProteinField::Metabolites.as_str().to_string(),
                record.metabolites.into(),
            );
        }
        if is_selected(selection, &ProteinField::Pathways) {
            attributes.insert(
                ProteinField::Pathways.as_str().to_string(),
                record.pathways.into(),
            );
        }

        NodeTuple::new(
            record.accession,
            NodeType::Protein.as_str(),
            record.gene_name,
            attributes,
        )
    }
}

/// Edge tuple for one reaction edge
///
/// The edge label is the metabolite's role in the reaction.
pub fn reaction_edge(edge: ReactionEdge, edge_fields: Option<&[EdgeField]>) -> EdgeTuple {
    let mut attributes = Attributes::new();

    if is_selected(edge_fields, &EdgeField::Status) {
        attributes.insert(
            EdgeField::Status.as_str().to_string(),
            edge.attributes.status.into(),
        );
    }
    if is_selected(edge_fields, &EdgeField::ReactionId) {
        attributes.insert(
            EdgeField::ReactionId.as_str().to_string(),
            i64::from(edge.attributes.reaction_id).into(),
        );
    }

    EdgeTuple::new(
        edge.metabolite_id,
        edge.enzyme_id,
        edge.role.as_str(),
        attributes,
    )
}

enum Stage {
    Start,
    Metabolites(MetaboliteRecords<Box<dyn BufRead + Send>>),
    LoadProteins,
    Proteins(std::vec::IntoIter<std::result::Result<ProteinRecord, MissingFieldError>>),
    Done,
}

/// Lazy sequence of node tuples, metabolites first
pub struct NodeStream<'a> {
    adapter: &'a HmdbAdapter,
    stage: Stage,
}

impl NodeStream<'_> {
    fn fail(&mut self, error: IngestError) -> Option<Result<NodeTuple>> {
        warn!(error = %error, "Node stream stopped");
        self.stage = Stage::Done;
        Some(Err(error))
    }
}

impl Iterator for NodeStream<'_> {
    type Item = Result<NodeTuple>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.stage {
                Stage::Start => match self.adapter.open_metabolites() {
                    Ok(Some(records)) => self.stage = Stage::Metabolites(records),
                    Ok(None) => self.stage = Stage::LoadProteins,
                    Err(error) => return self.fail(error),
                },
                Stage::Metabolites(records) => match records.next() {
                    Some(Ok(record)) => return Some(Ok(self.adapter.metabolite_node(record))),
                    Some(Err(error)) => return self.fail(IngestError::Metabolite(error)),
                    None => self.stage = Stage::LoadProteins,
                },
                Stage::LoadProteins => match self.adapter.load_proteins() {
                    Ok(records) => self.stage = Stage::Proteins(records.into_iter()),
                    Err(error) => return self.fail(error),
                },
                Stage::Proteins(records) => match records.next() {
                    Some(Ok(record)) => return Some(Ok(self.adapter.protein_node(record))),
                    Some(Err(error)) => return self.fail(IngestError::MissingField(error)),
                    None => self.stage = Stage::Done,
                },
                Stage::Done => return None,
            }
        }
    }
}

impl std::iter::FusedIterator for NodeStream<'_> {}

/// Lazy sequence of edge tuples
pub struct EdgeStream<F> {
    edges: Option<ReactionEdges<F>>,
    edge_fields: Option<Vec<EdgeField>>,
}

impl<F> EdgeStream<F> {
    /// Number of reaction pages skipped so far
    pub fn failed(&self) -> usize {
        self.edges.as_ref().map_or(0, ReactionEdges::failed)
    }
}

impl<F: PageFetcher> Iterator for EdgeStream<F> {
    type Item = EdgeTuple;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.edges.as_mut()?.next()?;
        Some(reaction_edge(edge, self.edge_fields.as_deref()))
    }
}
