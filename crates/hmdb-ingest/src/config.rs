//! Adapter configuration
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional config file (TOML, YAML or JSON), and `HMDB_*` environment
//! variables (nested keys separated by `__`, e.g. `HMDB_SOURCES__PROTEINS`).

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{IngestError, Result};
use crate::fields::{EdgeField, EdgeType, MetaboliteField, NodeType, ProteinField};
use crate::reaction::{DEFAULT_REACTION_IDS, DEFAULT_REACTION_URL};

// ============================================================================
// Defaults
// ============================================================================

/// Advisory batch size for downstream writers
pub const DEFAULT_ID_BATCH_SIZE: usize = 1_000_000;

/// Metabolite records read in test mode
pub const DEFAULT_TEST_RECORD_LIMIT: usize = 100;

pub const DEFAULT_METABOLITE_PATH: &str = "data/hmdb_metabolites.xml";
pub const DEFAULT_TEST_METABOLITE_PATH: &str = "data/hmdb_metabolites_testing.xml";
pub const DEFAULT_PROTEIN_PATH: &str = "data/hmdb_proteins.xml";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("hmdb-ingest/", env!("CARGO_PKG_VERSION"));

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HMDB";

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Advisory batch size; not enforced by the extractors
    pub id_batch_size: usize,
    /// Node types to emit (None for all)
    pub node_types: Option<Vec<NodeType>>,
    /// Metabolite attributes to emit (None for all)
    pub metabolite_fields: Option<Vec<MetaboliteField>>,
    /// Protein attributes to emit (None for all)
    pub protein_fields: Option<Vec<ProteinField>>,
    /// Edge types to emit (None for all)
    pub edge_types: Option<Vec<EdgeType>>,
    /// Edge attributes to emit (None for all)
    pub edge_fields: Option<Vec<EdgeField>>,
    /// Read the test metabolite source with a record limit
    pub test_mode: bool,
    pub test_record_limit: usize,
    pub sources: SourceConfig,
    pub reactions: ReactionConfig,
}

/// Locations of the XML dumps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub metabolites: PathBuf,
    pub test_metabolites: PathBuf,
    pub proteins: PathBuf,
}

/// Reaction scraping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    /// Page URL with an `{id}` placeholder
    pub url_template: String,
    /// First reaction id (inclusive)
    pub first_id: u32,
    /// Last reaction id (exclusive)
    pub last_id: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            id_batch_size: DEFAULT_ID_BATCH_SIZE,
            node_types: None,
            metabolite_fields: None,
            protein_fields: None,
            edge_types: None,
            edge_fields: None,
            test_mode: false,
            test_record_limit: DEFAULT_TEST_RECORD_LIMIT,
            sources: SourceConfig::default(),
            reactions: ReactionConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            metabolites: PathBuf::from(DEFAULT_METABOLITE_PATH),
            test_metabolites: PathBuf::from(DEFAULT_TEST_METABOLITE_PATH),
            proteins: PathBuf::from(DEFAULT_PROTEIN_PATH),
        }
    }
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_REACTION_URL.to_string(),
            first_id: DEFAULT_REACTION_IDS.start,
            last_id: DEFAULT_REACTION_IDS.end,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReactionConfig {
    pub fn reaction_ids(&self) -> Range<u32> {
        self.first_id..self.last_id
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AdapterConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| IngestError::Config(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.id_batch_size == 0 {
            return Err(IngestError::Config(
                "id_batch_size must be greater than 0".to_string(),
            ));
        }

        if self.test_mode && self.test_record_limit == 0 {
            return Err(IngestError::Config(
                "test_record_limit must be greater than 0 in test mode".to_string(),
            ));
        }

        if !self.reactions.url_template.contains("{id}") {
            return Err(IngestError::Config(format!(
                "Reaction URL template has no {{id}} placeholder: {}",
                self.reactions.url_template
            )));
        }

        if self.reactions.first_id > self.reactions.last_id {
            return Err(IngestError::Config(format!(
                "Reaction id range is reversed: {}..{}",
                self.reactions.first_id, self.reactions.last_id
            )));
        }

        Ok(())
    }

    /// Metabolite source for the current mode
    pub fn metabolite_source(&self) -> &Path {
        if self.test_mode {
            &self.sources.test_metabolites
        } else {
            &self.sources.metabolites
        }
    }

    /// Record limit for the current mode
    pub fn metabolite_limit(&self) -> Option<usize> {
        self.test_mode.then_some(self.test_record_limit)
    }
}
