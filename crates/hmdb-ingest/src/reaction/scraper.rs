//! HMDB reaction page scraper
//!
//! Reaction pages are addressed by sequential integer ids. Each page holds a
//! `reaction-panel` with links to the participating metabolites, a link to
//! the catalysing enzyme, a status line and a heading with the equation
//! (`A + B = C + D`). Metabolite links appear in equation order, so the
//! number of reactant terms decides which links are reactants.
//!
//! Pages are independent: a page that cannot be fetched or parsed is logged
//! and skipped, and scraping continues with the next id.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::fetch::PageFetcher;
use super::models::{ReactionAttributes, ReactionEdge, ReactionPage, ReactionRole};
use crate::error::ScrapeFailure;

/// Reaction page URL; `{id}` is replaced by the reaction id
pub const DEFAULT_REACTION_URL: &str = "https://hmdb.ca/reactions/{id}";

/// Reaction ids scraped when none are configured
pub const DEFAULT_REACTION_IDS: Range<u32> = 1..10;

#[allow(clippy::expect_used)]
static METABOLITE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/metabolites/(HMDB\d+)").expect("valid regex"));
#[allow(clippy::expect_used)]
static PROTEIN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/proteins/(HMDBP\d+)").expect("valid regex"));

const STATUS_LABEL: &str = "Status";

/// Scraper over a range of reaction pages
pub struct ReactionScraper<F> {
    fetcher: F,
    url_template: String,
    reaction_ids: Range<u32>,
}

impl<F: PageFetcher> ReactionScraper<F> {
    pub fn new(fetcher: F, url_template: impl Into<String>, reaction_ids: Range<u32>) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
            reaction_ids,
        }
    }

    pub fn reaction_url(&self, reaction_id: u32) -> String {
        self.url_template.replace("{id}", &reaction_id.to_string())
    }

    /// Fetch and classify a single reaction page
    pub fn scrape_reaction(&self, reaction_id: u32) -> Result<Vec<ReactionEdge>, ScrapeFailure> {
        let html = self.fetcher.fetch(&self.reaction_url(reaction_id))?;
        let page = parse_reaction_page(&html)?;
        classify_edges(&page, reaction_id)
    }

    /// Lazily scrape every configured reaction id in order
    pub fn edges(self) -> ReactionEdges<F> {
        let remaining = self.reaction_ids.clone();
        ReactionEdges {
            scraper: self,
            remaining,
            pending: Vec::new().into_iter(),
            failed: 0,
            done: false,
        }
    }
}

/// Lazy sequence of reaction edges
///
/// Per-page failures never surface as items; they are logged at `warn`.
pub struct ReactionEdges<F> {
    scraper: ReactionScraper<F>,
    remaining: Range<u32>,
    pending: std::vec::IntoIter<ReactionEdge>,
    failed: usize,
    done: bool,
}

impl<F> ReactionEdges<F> {
    /// Number of reaction ids skipped so far
    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl<F: PageFetcher> Iterator for ReactionEdges<F> {
    type Item = ReactionEdge;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(edge) = self.pending.next() {
                return Some(edge);
            }

            let Some(reaction_id) = self.remaining.next() else {
                if !self.done {
                    self.done = true;
                    info!(
                        reactions = self.scraper.reaction_ids.len(),
                        failed = self.failed,
                        "Finished scraping reactions"
                    );
                }
                return None;
            };

            match self.scraper.scrape_reaction(reaction_id) {
                Ok(edges) => {
                    debug!(reaction_id, edges = edges.len(), "Scraped reaction");
                    self.pending = edges.into_iter();
                },
                Err(error) => {
                    self.failed += 1;
                    warn!(reaction_id, error = %error, "Could not parse reaction");
                },
            }
        }
    }
}

/// Read the reaction panel of a page
pub fn parse_reaction_page(html: &str) -> Result<ReactionPage, ScrapeFailure> {
    let document = Html::parse_document(html);

    let panel = document
        .select(&selector(".reaction-panel")?)
        .next()
        .ok_or(ScrapeFailure::MissingPanel)?;

    let hrefs: Vec<&str> = panel
        .select(&selector("a[href]")?)
        .filter_map(|link| link.value().attr("href"))
        .collect();

    let metabolite_ids: Vec<String> = hrefs
        .iter()
        .filter_map(|href| METABOLITE_LINK.captures(href))
        .map(|caps| caps[1].to_string())
        .collect();

    let enzyme_id = hrefs
        .iter()
        .find_map(|href| PROTEIN_LINK.captures(href))
        .map(|caps| caps[1].to_string())
        .ok_or(ScrapeFailure::MissingEnzyme)?;

    let status = read_status(&element_text(panel)).ok_or(ScrapeFailure::MissingStatus)?;

    let heading = panel
        .select(&selector(".panel-heading")?)
        .next()
        .or_else(|| document.select(&selector(".panel-heading").ok()?).next())
        .or_else(|| panel.select(&selector("h1, h2, h3, h4, h5, h6").ok()?).next())
        .ok_or(ScrapeFailure::MissingEquation)?;

    Ok(ReactionPage {
        metabolite_ids,
        status,
        enzyme_id,
        equation: element_text(heading),
    })
}

/// Split `A + B = C` into reactant and product terms
///
/// Empty terms are dropped, so charges written as a trailing `+`
/// (`NAD+ + H2O`) do not add phantom terms.
pub fn split_equation(equation: &str) -> Result<(Vec<String>, Vec<String>), ScrapeFailure> {
    let sides: Vec<&str> = equation.split('=').collect();
    let [reactants, products] = sides.as_slice() else {
        return Err(ScrapeFailure::InvalidEquation(equation.to_string()));
    };

    let terms = |side: &str| -> Vec<String> {
        side.split('+')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect()
    };

    let reactants = terms(*reactants);
    let products = terms(*products);

    if reactants.is_empty() || products.is_empty() {
        return Err(ScrapeFailure::InvalidEquation(equation.to_string()));
    }

    Ok((reactants, products))
}

/// One edge per metabolite link; the first links, one per reactant term,
/// are reactants and the remainder products
pub fn classify_edges(
    page: &ReactionPage,
    reaction_id: u32,
) -> Result<Vec<ReactionEdge>, ScrapeFailure> {
    let (reactants, _) = split_equation(&page.equation)?;

    Ok(page
        .metabolite_ids
        .iter()
        .enumerate()
        .map(|(position, metabolite_id)| ReactionEdge {
            metabolite_id: metabolite_id.clone(),
            enzyme_id: page.enzyme_id.clone(),
            role: if position < reactants.len() {
                ReactionRole::Reactant
            } else {
                ReactionRole::Product
            },
            attributes: ReactionAttributes {
                status: page.status.clone(),
                reaction_id,
            },
        })
        .collect())
}

fn read_status(panel_text: &str) -> Option<String> {
    let (_, after) = panel_text.split_once(STATUS_LABEL)?;
    after
        .split_whitespace()
        .map(|token| token.trim_start_matches(':'))
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> Result<Selector, ScrapeFailure> {
    Selector::parse(css).map_err(|e| ScrapeFailure::Selector(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_equation() {
        let (reactants, products) = split_equation("A + B = C").unwrap();
        assert_eq!(reactants, vec!["A", "B"]);
        assert_eq!(products, vec!["C"]);
    }

    #[test]
    fn test_split_equation_with_charged_terms() {
        let (reactants, products) = split_equation("NAD+ + Ethanol = NADH + H+ + Acetaldehyde").unwrap();
        assert_eq!(reactants, vec!["NAD", "Ethanol"]);
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_split_equation_rejects_malformed() {
        assert!(split_equation("A + B").is_err());
        assert!(split_equation("A = B = C").is_err());
        assert!(split_equation(" = C").is_err());
    }

    #[test]
    fn test_read_status() {
        assert_eq!(read_status("Reaction Status Predicted More").as_deref(), Some("Predicted"));
        assert_eq!(read_status("Status: Expected").as_deref(), Some("Expected"));
        assert_eq!(read_status("no label here"), None);
        assert_eq!(read_status("Status"), None);
    }

    #[test]
    fn test_reaction_url_template() {
        let fetcher = |_: &str| -> Result<String, ScrapeFailure> { Ok(String::new()) };
        let scraper = ReactionScraper::new(fetcher, "http://localhost/reactions/{id}", 1..2);
        assert_eq!(scraper.reaction_url(42), "http://localhost/reactions/42");
    }

    #[test]
    fn test_more_reactant_terms_than_links() {
        let page = ReactionPage {
            metabolite_ids: vec!["HMDB0000001".into()],
            status: "Predicted".into(),
            enzyme_id: "HMDBP00001".into(),
            equation: "A + B = C".into(),
        };

        let edges = classify_edges(&page, 1).unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].role, ReactionRole::Reactant);
    }

    #[test]
    fn test_link_patterns() {
        let caps = METABOLITE_LINK.captures("https://hmdb.ca/metabolites/HMDB0000122").unwrap();
        assert_eq!(&caps[1], "HMDB0000122");
        assert!(METABOLITE_LINK.captures("/proteins/HMDBP00001").is_none());

        let caps = PROTEIN_LINK.captures("/proteins/HMDBP00001").unwrap();
        assert_eq!(&caps[1], "HMDBP00001");
        assert!(PROTEIN_LINK.captures("/metabolites/HMDB0000122").is_none());
    }
}
