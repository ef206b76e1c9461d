//! Integration tests for the reaction page scraper

use hmdb_ingest::error::ScrapeFailure;
use hmdb_ingest::reaction::{
    parse_reaction_page, HttpFetcher, PageFetcher, ReactionRole, ReactionScraper,
};
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn sample_page() -> String {
    std::fs::read_to_string(fixture_path().join("reaction_sample.html"))
        .expect("Failed to read reaction fixture")
}

fn reaction_page(equation: &str, metabolites: &[&str], enzyme: &str, status: &str) -> String {
    let links: String = metabolites
        .iter()
        .map(|id| format!("<a href=\"/metabolites/{id}\">{id}</a> "))
        .collect();

    format!(
        "<html><body><div class=\"reaction-panel\">\
         <h3>{equation}</h3>\
         <div>{links}</div>\
         <div>Enzyme <a href=\"/proteins/{enzyme}\">{enzyme}</a></div>\
         <div>Status {status}</div>\
         </div></body></html>"
    )
}

#[test]
fn test_parse_sample_page() {
    let page = parse_reaction_page(&sample_page()).unwrap();

    assert_eq!(
        page.metabolite_ids,
        vec!["HMDB0000898", "HMDB0000939", "HMDB0000870"]
    );
    assert_eq!(page.enzyme_id, "HMDBP00001");
    assert_eq!(page.status, "Predicted");
    assert_eq!(
        page.equation,
        "1-Methylhistamine + S-Adenosylhomocysteine = Histamine"
    );
}

#[test]
fn test_two_reactants_one_product() {
    let html = reaction_page(
        "A + B = C",
        &["HMDB0000001", "HMDB0000002", "HMDB0000003"],
        "HMDBP00009",
        "Predicted",
    );
    let fetcher = move |_: &str| -> Result<String, ScrapeFailure> { Ok(html.clone()) };

    let edges = ReactionScraper::new(fetcher, "mem://{id}", 1..2)
        .scrape_reaction(4)
        .unwrap();

    let roles: Vec<_> = edges.iter().map(|edge| edge.role).collect();
    assert_eq!(
        roles,
        vec![ReactionRole::Reactant, ReactionRole::Reactant, ReactionRole::Product]
    );
    assert!(edges.iter().all(|edge| edge.enzyme_id == "HMDBP00009"));
    assert!(edges.iter().all(|edge| edge.attributes.reaction_id == 4));
    assert!(edges.iter().all(|edge| edge.attributes.status == "Predicted"));
    assert_eq!(edges[2].metabolite_id, "HMDB0000003");
}

#[test]
fn test_failing_page_is_skipped() {
    let fetcher = |url: &str| -> Result<String, ScrapeFailure> {
        match url {
            "mem://2" => Ok("<html><body>Not found</body></html>".to_string()),
            "mem://3" => Err(ScrapeFailure::Status {
                url: url.to_string(),
                status: 500,
            }),
            _ => Ok(reaction_page(
                "A = B",
                &["HMDB0000001", "HMDB0000002"],
                "HMDBP00001",
                "Expected",
            )),
        }
    };

    let mut edges = ReactionScraper::new(fetcher, "mem://{id}", 1..5).edges();
    let collected: Vec<_> = edges.by_ref().collect();

    let reaction_ids: Vec<u32> = collected
        .iter()
        .map(|edge| edge.attributes.reaction_id)
        .collect();
    assert_eq!(reaction_ids, vec![1, 1, 4, 4]);
    assert_eq!(edges.failed(), 2);
}

#[test]
fn test_page_failures_are_classified() {
    let missing_status = reaction_page("A = B", &["HMDB1"], "HMDBP1", "")
        .replace("Status ", "");
    assert!(matches!(
        parse_reaction_page(&missing_status),
        Err(ScrapeFailure::MissingStatus)
    ));

    let missing_enzyme = "<div class=\"reaction-panel\"><h3>A = B</h3>Status Predicted</div>";
    assert!(matches!(
        parse_reaction_page(missing_enzyme),
        Err(ScrapeFailure::MissingEnzyme)
    ));

    assert!(matches!(
        parse_reaction_page("<html><body></body></html>"),
        Err(ScrapeFailure::MissingPanel)
    ));
}

#[test]
fn test_equation_without_equals_skips_reaction() {
    let html = reaction_page("A + B", &["HMDB1", "HMDB2"], "HMDBP1", "Predicted");
    let fetcher = move |_: &str| -> Result<String, ScrapeFailure> { Ok(html.clone()) };

    let scraper = ReactionScraper::new(fetcher, "mem://{id}", 1..2);

    assert!(matches!(
        scraper.scrape_reaction(1),
        Err(ScrapeFailure::InvalidEquation(_))
    ));
    assert_eq!(scraper.edges().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_fetcher_against_mock_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reactions/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_page()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reactions/8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let template = format!("{}/reactions/{{id}}", server.uri());

    // The blocking client must not run on an async worker thread
    let (edges, failed, not_found) = tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "hmdb-ingest-test").unwrap();
        let not_found = fetcher.fetch(&template.replace("{id}", "8"));

        let mut edges = ReactionScraper::new(fetcher, template, 7..9).edges();
        let collected: Vec<_> = edges.by_ref().collect();
        (collected, edges.failed(), not_found)
    })
    .await
    .unwrap();

    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0].metabolite_id, "HMDB0000898");
    assert_eq!(edges[0].role, ReactionRole::Reactant);
    assert_eq!(edges[2].role, ReactionRole::Product);
    assert_eq!(failed, 1);
    assert!(matches!(not_found, Err(ScrapeFailure::Status { status: 404, .. })));
}
