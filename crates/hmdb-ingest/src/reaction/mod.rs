//! HMDB reaction scraping
//!
//! Builds metabolite-to-enzyme edges from the public reaction pages.
//!
//! # Example
//! ```no_run
//! use hmdb_ingest::reaction::{HttpFetcher, ReactionScraper, DEFAULT_REACTION_URL};
//! use std::time::Duration;
//!
//! # fn example() -> anyhow::Result<()> {
//! let fetcher = HttpFetcher::new(Duration::from_secs(30), "hmdb-ingest")?;
//! let scraper = ReactionScraper::new(fetcher, DEFAULT_REACTION_URL, 1..10);
//! for edge in scraper.edges() {
//!     tracing::info!(metabolite = %edge.metabolite_id, role = %edge.role, "edge");
//! }
//! # Ok(())
//! # }
//! ```

pub mod fetch;
pub mod models;
pub mod scraper;

pub use fetch::{HttpFetcher, PageFetcher};
pub use models::{ReactionAttributes, ReactionEdge, ReactionPage, ReactionRole};
pub use scraper::{
    classify_edges, parse_reaction_page, split_equation, ReactionEdges, ReactionScraper,
    DEFAULT_REACTION_IDS, DEFAULT_REACTION_URL,
};
