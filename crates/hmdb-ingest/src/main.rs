//! HMDB Ingest - graph extraction tool

use anyhow::{Context, Result};
use clap::Parser;
use hmdb_common::logging::{init_logging, LogConfig, LogLevel};
use hmdb_ingest::sink::JsonLinesWriter;
use hmdb_ingest::{AdapterConfig, HmdbAdapter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hmdb-ingest")]
#[command(author, version, about = "HMDB graph extraction tool")]
struct Cli {
    /// What to extract
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "HMDB_CONFIG")]
    config: Option<PathBuf>,

    /// Read the test metabolite file with a record limit
    #[arg(long, global = true)]
    test_mode: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Extract metabolite and protein nodes
    Nodes {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scrape metabolite-to-enzyme reaction edges
    Edges {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("hmdb-ingest")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let _guard = init_logging(&log_config)?;

    let mut config = AdapterConfig::load(cli.config.as_deref())
        .context("Failed to load adapter configuration")?;
    if cli.test_mode {
        config.test_mode = true;
        config.validate()?;
    }

    let adapter = HmdbAdapter::new(config);
    info!(
        source = adapter.data_source(),
        version = adapter.data_version(),
        "Starting extraction"
    );

    match cli.command {
        Command::Nodes { output } => {
            let mut writer = open_writer(output.as_deref(), adapter.config().id_batch_size)?;
            for node in adapter.get_nodes() {
                writer.write(&node?)?;
            }
            let written = writer.finish()?;
            info!(nodes = written, "Node extraction complete");
        },
        Command::Edges { output } => {
            let mut writer = open_writer(output.as_deref(), adapter.config().id_batch_size)?;
            let mut edges = adapter.get_edges()?;
            for edge in edges.by_ref() {
                writer.write(&edge)?;
            }
            let written = writer.finish()?;
            info!(edges = written, failed_reactions = edges.failed(), "Edge extraction complete");
        },
    }

    Ok(())
}

fn open_writer(path: Option<&Path>, batch_size: usize) -> Result<JsonLinesWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    Ok(JsonLinesWriter::new(writer, batch_size))
}
