//! Streaming parser for the HMDB metabolite XML dump
//!
//! The metabolite dump is several gigabytes, so it is never loaded into
//! memory. A pull reader walks the document event by event and a single
//! `MetaboliteBuilder` accumulates the fields of the metabolite currently
//! open. One record is yielded per closed `<metabolite>` element.
//!
//! The dump reuses local names at different depths: `<accession>` appears
//! both as the primary accession and inside `<secondary_accessions>`, and
//! `<name>` appears on the metabolite, on every pathway and on several other
//! nested structures. The builder keeps the stack of open elements and
//! resolves each close event against it:
//!
//! - scalar fields are taken only from direct children of `<metabolite>`
//! - a `<name>` with an open `<pathways>` ancestor is a pathway name
//! - `<protein_accession>` is collected at any depth

use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, trace};

use super::models::MetaboliteRecord;
use crate::error::ParseError;

const METABOLITE: &str = "metabolite";
const PATHWAYS: &str = "pathways";

/// Parser for HMDB metabolite XML files
#[derive(Debug, Clone, Default)]
pub struct MetaboliteParser {
    /// Maximum number of records to yield (None for unlimited)
    limit: Option<usize>,
}

impl MetaboliteParser {
    /// Create a new parser with no limit
    pub fn new() -> Self {
        Self { limit: None }
    }

    /// Create a new parser that stops after `limit` records
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Open a metabolite XML file and stream its records
    ///
    /// Files ending in `.gz` are decompressed on the fly.
    pub fn parse_file(
        &self,
        path: &Path,
    ) -> Result<MetaboliteRecords<Box<dyn BufRead + Send>>, ParseError> {
        let file = File::open(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;

        info!(path = %path.display(), limit = ?self.limit, "Streaming metabolite records");

        let reader: Box<dyn BufRead + Send> =
            if path.extension().and_then(|s| s.to_str()) == Some("gz") {
                Box::new(BufReader::new(GzDecoder::new(file)))
            } else {
                Box::new(BufReader::new(file))
            };

        Ok(self.parse_reader(reader))
    }

    /// Stream records from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> MetaboliteRecords<R> {
        MetaboliteRecords {
            reader: Some(Reader::from_reader(reader)),
            buf: Vec::new(),
            builder: MetaboliteBuilder::default(),
            limit: self.limit,
            emitted: 0,
        }
    }

    /// Stream records from an in-memory document
    pub fn parse_str<'a>(&self, xml: &'a str) -> MetaboliteRecords<&'a [u8]> {
        self.parse_reader(xml.as_bytes())
    }
}

/// Lazy sequence of metabolite records
///
/// Owns the underlying reader. The reader is dropped as soon as the document
/// is exhausted, a fatal error is yielded, or the limit is reached; dropping
/// the iterator early releases it as well.
pub struct MetaboliteRecords<R: BufRead> {
    reader: Option<Reader<R>>,
    buf: Vec<u8>,
    builder: MetaboliteBuilder,
    limit: Option<usize>,
    emitted: usize,
}

impl<R: BufRead> MetaboliteRecords<R> {
    /// Number of records yielded so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Number of metabolite elements skipped for lacking an accession
    pub fn skipped(&self) -> usize {
        self.builder.skipped
    }

    fn finish(&mut self) {
        if self.reader.take().is_some() {
            info!(
                emitted = self.emitted,
                skipped = self.builder.skipped,
                "Finished metabolite stream"
            );
        }
    }
}

impl<R: BufRead> Iterator for MetaboliteRecords<R> {
    type Item = Result<MetaboliteRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            self.finish();
            return None;
        }

        loop {
            let reader = self.reader.as_mut()?;
            self.buf.clear();

            let step = match reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(element)) => {
                    self.builder
                        .open(&String::from_utf8_lossy(element.local_name().as_ref()));
                    Step::Pending
                },
                Ok(Event::End(element)) => self
                    .builder
                    .close(&String::from_utf8_lossy(element.local_name().as_ref()))
                    .map_or(Step::Pending, Step::Record),
                Ok(Event::Empty(element)) => {
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    self.builder.open(&name);
                    self.builder.close(&name).map_or(Step::Pending, Step::Record)
                },
                Ok(Event::Text(text)) if self.builder.collecting() => match text.unescape() {
                    Ok(content) => {
                        self.builder.text(&content);
                        Step::Pending
                    },
                    Err(source) => Step::Failed(ParseError::Xml {
                        position: reader.buffer_position(),
                        source: quick_xml::Error::from(source),
                    }),
                },
                Ok(Event::CData(data)) if self.builder.collecting() => match data.decode() {
                    Ok(content) => {
                        self.builder.text(&content);
                        Step::Pending
                    },
                    Err(source) => Step::Failed(ParseError::Xml {
                        position: reader.buffer_position(),
                        source: quick_xml::Error::from(source),
                    }),
                },
                Ok(Event::Eof) => match self.builder.stack.last() {
                    Some(innermost) => Step::Failed(ParseError::UnexpectedEof {
                        open: self.builder.stack.len(),
                        innermost: innermost.clone(),
                    }),
                    None => Step::End,
                },
                Ok(_) => Step::Pending,
                Err(source) => Step::Failed(ParseError::Xml {
                    position: reader.buffer_position(),
                    source,
                }),
            };

            match step {
                Step::Pending => continue,
                Step::Record(record) => {
                    self.emitted += 1;
                    trace!(accession = %record.accession, "Parsed metabolite");
                    return Some(Ok(record));
                },
                Step::End => {
                    self.finish();
                    return None;
                },
                Step::Failed(error) => {
                    self.finish();
                    return Some(Err(error));
                },
            }
        }
    }
}

/// Outcome of a single reader event
enum Step {
    Pending,
    Record(MetaboliteRecord),
    End,
    Failed(ParseError),
}

impl<R: BufRead> std::iter::FusedIterator for MetaboliteRecords<R> {}

/// Accumulation state for the metabolite currently open
///
/// All buffers are cleared in place after each record so their allocations
/// are reused for the next one.
#[derive(Debug, Default)]
struct MetaboliteBuilder {
    /// Local names of the open elements, outermost first
    stack: Vec<String>,
    /// Stack index of the open `<metabolite>`, if any
    metabolite_depth: Option<usize>,
    /// Character data of the innermost element, reset on every open and close
    text: String,

    accession: String,
    name: String,
    kegg_id: String,
    pubchem_compound_id: String,
    chebi_id: String,
    inchi: String,

    /// Keyed by accession; the empty key holds associations seen before it
    proteins_by_accession: HashMap<String, Vec<String>>,
    pathways_by_accession: HashMap<String, Vec<String>>,

    skipped: usize,
}

impl MetaboliteBuilder {
    fn collecting(&self) -> bool {
        self.metabolite_depth.is_some()
    }

    fn open(&mut self, name: &str) {
        self.text.clear();
        if name == METABOLITE && self.metabolite_depth.is_none() {
            self.metabolite_depth = Some(self.stack.len());
        }
        self.stack.push(name.to_string());
    }

    fn text(&mut self, content: &str) {
        self.text.push_str(content);
    }

    fn close(&mut self, name: &str) -> Option<MetaboliteRecord> {
        self.stack.pop();
        let completed = match self.metabolite_depth {
            Some(depth) if self.stack.len() == depth => self.finalize(),
            Some(depth) => {
                self.route(name, depth);
                None
            },
            None => None,
        };
        self.text.clear();
        completed
    }

    /// Store the text of a closed element inside the open metabolite
    fn route(&mut self, name: &str, depth: usize) {
        // After the pop, the metabolite sits at `depth`; its direct children
        // close with exactly one more element on the stack.
        let direct_child = self.stack.len() == depth + 1;
        let in_pathways = self.stack[depth + 1..].iter().any(|open| open == PATHWAYS);
        let value = self.text.trim();

        match name {
            "accession" if direct_child => {
                if self.accession.is_empty() && !value.is_empty() {
                    self.accession.push_str(value);
                    self.rekey_pending();
                }
            },
            "kegg_id" if direct_child => write_once(&mut self.kegg_id, value),
            "pubchem_compound_id" if direct_child => {
                write_once(&mut self.pubchem_compound_id, value)
            },
            "chebi_id" if direct_child => write_once(&mut self.chebi_id, value),
            "inchi" if direct_child => write_once(&mut self.inchi, value),
            "name" if in_pathways => {
                if !value.is_empty() {
                    self.pathways_by_accession
                        .entry(self.accession.clone())
                        .or_default()
                        .push(value.to_string());
                }
            },
            "name" if direct_child => write_once(&mut self.name, value),
            "protein_accession" => {
                if !value.is_empty() {
                    self.proteins_by_accession
                        .entry(self.accession.clone())
                        .or_default()
                        .push(value.to_string());
                }
            },
            _ => {},
        }
    }

    /// Move associations collected before the accession was known
    fn rekey_pending(&mut self) {
        for map in [&mut self.proteins_by_accession, &mut self.pathways_by_accession] {
            if let Some(pending) = map.remove("") {
                map.insert(self.accession.clone(), pending);
            }
        }
    }

    fn finalize(&mut self) -> Option<MetaboliteRecord> {
        self.metabolite_depth = None;

        if self.accession.is_empty() {
            self.skipped += 1;
            debug!(name = %self.name, "Skipping metabolite without accession");
            self.reset();
            return None;
        }

        let record = MetaboliteRecord {
            accession: self.accession.clone(),
            name: self.name.clone(),
            kegg_id: self.kegg_id.clone(),
            pubchem_compound_id: self.pubchem_compound_id.clone(),
            chebi_id: self.chebi_id.clone(),
            inchi: self.inchi.clone(),
            protein_accession: self
                .proteins_by_accession
                .remove(&self.accession)
                .unwrap_or_default(),
            pathways: self
                .pathways_by_accession
                .remove(&self.accession)
                .unwrap_or_default(),
        };

        self.reset();
        Some(record)
    }

    fn reset(&mut self) {
        self.accession.clear();
        self.name.clear();
        self.kegg_id.clear();
        self.pubchem_compound_id.clear();
        self.chebi_id.clear();
        self.inchi.clear();
        self.proteins_by_accession.clear();
        self.pathways_by_accession.clear();
    }
}

fn write_once(slot: &mut String, value: &str) {
    if slot.is_empty() {
        slot.push_str(value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse_all(xml: &str) -> Vec<MetaboliteRecord> {
        MetaboliteParser::new()
            .parse_str(xml)
            .collect::<Result<Vec<_>, _>>()
            .expect("document should parse")
    }

    #[test]
    fn test_secondary_accessions_do_not_replace_primary() {
        let xml = r#"
        <hmdb xmlns="http://www.hmdb.ca">
          <metabolite>
            <accession>HMDB0000001</accession>
            <secondary_accessions>
              <accession>HMDB00001</accession>
              <accession>HMDB0004935</accession>
            </secondary_accessions>
            <name>1-Methylhistidine</name>
          </metabolite>
        </hmdb>"#;

        let records = parse_all(xml);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].accession, "HMDB0000001");
    }

    #[test]
    fn test_associations_before_accession_are_kept() {
        let xml = r#"
        <hmdb>
          <metabolite>
            <protein_associations>
              <protein><protein_accession>HMDBP00001</protein_accession></protein>
            </protein_associations>
            <biological_properties>
              <pathways><pathway><name>Histidine Metabolism</name></pathway></pathways>
            </biological_properties>
            <accession>HMDB0000001</accession>
          </metabolite>
        </hmdb>"#;

        let records = parse_all(xml);

        assert_eq!(records[0].protein_accession, vec!["HMDBP00001"]);
        assert_eq!(records[0].pathways, vec!["Histidine Metabolism"]);
    }

    #[test]
    fn test_nested_names_outside_pathways_are_ignored() {
        let xml = r#"
        <hmdb>
          <metabolite>
            <accession>HMDB0000002</accession>
            <protein_associations>
              <protein>
                <protein_accession>HMDBP00002</protein_accession>
                <name>Histamine N-methyltransferase</name>
              </protein>
            </protein_associations>
            <name>1,3-Diaminopropane</name>
          </metabolite>
        </hmdb>"#;

        let records = parse_all(xml);

        assert_eq!(records[0].name, "1,3-Diaminopropane");
        assert!(records[0].pathways.is_empty());
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let xml = "<hmdb><metabolite><accession>HMDB0000003</accession>\
                   <name>Alpha &amp; Beta</name>\
                   <inchi><![CDATA[InChI=1S/CH4/h1H4]]></inchi></metabolite></hmdb>";

        let records = parse_all(xml);

        assert_eq!(records[0].name, "Alpha & Beta");
        assert_eq!(records[0].inchi, "InChI=1S/CH4/h1H4");
    }

    #[test]
    fn test_self_closing_leaves_yield_empty_fields() {
        let xml = "<hmdb><metabolite><accession>HMDB0000004</accession>\
                   <kegg_id/><chebi_id></chebi_id></metabolite></hmdb>";

        let records = parse_all(xml);

        assert_eq!(records[0].kegg_id, "");
        assert_eq!(records[0].chebi_id, "");
    }

    #[test]
    fn test_limit_stops_stream() {
        let xml = "<hmdb>\
                   <metabolite><accession>A</accession></metabolite>\
                   <metabolite><accession>B</accession></metabolite>\
                   <metabolite><accession>C</accession></metabolite>\
                   </hmdb>";

        let mut records = MetaboliteParser::with_limit(2).parse_str(xml);

        assert_eq!(records.next().unwrap().unwrap().accession, "A");
        assert_eq!(records.next().unwrap().unwrap().accession, "B");
        assert!(records.next().is_none());
        assert_eq!(records.emitted(), 2);
    }

    #[test]
    fn test_buffers_reset_between_records() {
        let xml = "<hmdb>\
                   <metabolite><accession>A</accession><kegg_id>C1</kegg_id>\
                   <protein_accession>P1</protein_accession></metabolite>\
                   <metabolite><accession>B</accession></metabolite>\
                   </hmdb>";

        let records = parse_all(xml);

        assert_eq!(records[1].accession, "B");
        assert_eq!(records[1].kegg_id, "");
        assert!(records[1].protein_accession.is_empty());
    }
}
