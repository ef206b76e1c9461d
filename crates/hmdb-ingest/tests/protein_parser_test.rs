//! Integration tests for the protein document parser

use hmdb_ingest::error::ParseError;
use hmdb_ingest::protein::{ProteinDocument, ProteinRecord};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_parse_sample_file() {
    let document = ProteinDocument::from_path(&fixture_path().join("proteins_sample.xml"))
        .expect("Failed to read protein fixture");

    let records: Vec<ProteinRecord> = document
        .records()
        .expect("Failed to parse protein fixture")
        .collect::<Result<_, _>>()
        .expect("Every protein should be complete");

    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.accession, "HMDBP00001");
    assert_eq!(first.gene_name, "HNMT");
    assert_eq!(first.metabolites, vec!["HMDB0000001", "HMDB0000898"]);
    assert_eq!(first.pathways, vec!["Histidine Metabolism"]);

    // Associations listed before the protein's own accession
    let second = &records[1];
    assert_eq!(second.accession, "HMDBP00012");
    assert_eq!(second.gene_name, "HK1");
    assert_eq!(second.metabolites, vec!["HMDB0000122"]);
    assert!(second.pathways.is_empty());
}

#[test]
fn test_missing_gene_name_is_reported_and_iteration_continues() {
    let document =
        ProteinDocument::from_path(&fixture_path().join("proteins_missing_gene_name.xml")).unwrap();

    let items: Vec<_> = document.records().unwrap().collect();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap().accession, "HMDBP00001");

    let error = items[1].as_ref().unwrap_err();
    assert_eq!(error.field, "gene_name");
    assert_eq!(error.line, 7);
    assert_eq!(error.column, 1);

    assert_eq!(items[2].as_ref().unwrap().gene_name, "ADH1A");
}

#[test]
fn test_missing_accession_is_reported() {
    let xml = r#"<hmdb xmlns="http://www.hmdb.ca"><protein><gene_name>HNMT</gene_name></protein></hmdb>"#;

    let document = ProteinDocument::from_string(xml);
    let error = document.records().unwrap().next().unwrap().unwrap_err();

    assert_eq!(error.field, "accession");
    assert!(error.to_string().contains("accession"));
}

#[test]
fn test_malformed_document_fails_before_iteration() {
    let document =
        ProteinDocument::from_string("<hmdb xmlns=\"http://www.hmdb.ca\"><protein></hmdb>");

    assert!(matches!(document.records(), Err(ParseError::Document(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = ProteinDocument::from_path(&fixture_path().join("no_such_file.xml"));

    assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[test]
fn test_parsing_twice_is_identical() {
    let document = ProteinDocument::from_path(&fixture_path().join("proteins_sample.xml")).unwrap();

    let first: Vec<_> = document.records().unwrap().collect();
    let second: Vec<_> = document.records().unwrap().collect();

    assert_eq!(first, second);
}
