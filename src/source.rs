//! Source catalogue boundary.
//!
//! A [`SourceCatalog`] lists the records a publisher offers, with the
//! timestamps used for change detection, and fetches the document of one
//! record. Two implementations are provided:
//!
//! - [`DcatExportSource`] for a single DCAT export holding every dataset.
//! - [`StudyCatalogSource`] for a JSON search endpoint plus one JSON
//!   document per study.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::{HarvestConfig, RdfFormat};
use crate::dates::{cet, parse_timestamp};
use crate::error::{HarvestError, Result};
use crate::mapping::study::{map_study, StudyDocument, StudyProfile};
use crate::mapping::{extract_dataset, Extraction};
use crate::rdf::namespaces::dcterms;
use crate::rdf::{GraphAccessor, RdfGraph, RdfNode};

const TIMEOUT: Duration = Duration::from_secs(40);

/// One record offered by a source catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Stable source identifier; the ledger key.
    pub identifier: String,
    /// When the record was first published.
    pub created: Option<DateTime<Utc>>,
    /// When the record last changed.
    pub changed: Option<DateTime<Utc>>,
}

/// The fetched document of one record.
#[derive(Debug, Clone)]
pub enum SourceDocument {
    /// A dataset node inside a (shared) RDF graph.
    Rdf {
        /// Graph holding the dataset.
        graph: Arc<RdfGraph>,
        /// The `dcat:Dataset` node.
        subject: RdfNode,
    },
    /// A JSON study document.
    Study {
        /// The document.
        document: Box<StudyDocument>,
        /// Values shared by all studies of the source.
        profile: Arc<StudyProfile>,
    },
}

impl SourceDocument {
    /// Maps the document to the target schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a study document lacks its identifier.
    pub fn map(&self, config: &HarvestConfig) -> Result<Extraction> {
        match self {
            Self::Rdf { graph, subject } => {
                let acc = GraphAccessor::new(graph, config);
                Ok(extract_dataset(&acc, subject))
            },
            Self::Study { document, profile } => {
                map_study(document, profile, config).map(Extraction::mapped)
            },
        }
    }
}

/// A publisher's catalogue.
pub trait SourceCatalog: Send + Sync {
    /// Lists the records currently offered.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be retrieved.
    fn list(&self) -> Result<Vec<SourceEntry>>;

    /// Fetches the document of one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be retrieved or parsed.
    fn fetch(&self, entry: &SourceEntry) -> Result<SourceDocument>;
}

/// All datasets of one DCAT export.
///
/// The export is parsed once; `fetch` hands out the shared graph.
#[derive(Debug, Clone)]
pub struct DcatExportSource {
    graph: Arc<RdfGraph>,
    entries: Vec<SourceEntry>,
    nodes: HashMap<String, RdfNode>,
}

impl DcatExportSource {
    /// Indexes the datasets of a parsed graph.
    ///
    /// Datasets are keyed by `dcterms:identifier`, or by their node when
    /// they have none. Issued/modified dates without offset are read as
    /// Central European Time.
    #[must_use]
    pub fn from_graph(graph: RdfGraph) -> Self {
        let mut entries = Vec::new();
        let mut nodes = HashMap::new();
        for node in graph.dataset_nodes() {
            let identifier = graph
                .value(node, dcterms::IDENTIFIER)
                .map(|id| id.as_str().trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| node.as_str().to_string());
            if nodes.contains_key(&identifier) {
                log::warn!("Duplicate dataset identifier {identifier}, keeping the first");
                continue;
            }
            let timestamp = |predicate: &str| {
                graph
                    .value(node, predicate)
                    .and_then(|value| parse_timestamp(value.as_str(), cet()))
            };
            entries.push(SourceEntry {
                identifier: identifier.clone(),
                created: timestamp(dcterms::ISSUED),
                changed: timestamp(dcterms::MODIFIED),
            });
            nodes.insert(identifier, node.clone());
        }

        Self {
            graph: Arc::new(graph),
            entries,
            nodes,
        }
    }

    /// Reads an export from disk, guessing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RdfFormat::from_extension)
            .unwrap_or_default();
        let file = std::fs::File::open(path)?;
        let graph = RdfGraph::parse_from_reader(std::io::BufReader::new(file), format)?;
        Ok(Self::from_graph(graph))
    }

    /// Downloads and parses an export.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the body is not valid RDF.
    pub fn download(url: &str, format: RdfFormat) -> Result<Self> {
        log::info!("Downloading DCAT export from {url}");
        let client = Client::builder().timeout(TIMEOUT).build()?;
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, format.mime_type())
            .send()?
            .error_for_status()?;
        let graph = RdfGraph::parse_from_reader(response, format)?;
        Ok(Self::from_graph(graph))
    }
}

impl SourceCatalog for DcatExportSource {
    fn list(&self) -> Result<Vec<SourceEntry>> {
        Ok(self.entries.clone())
    }

    fn fetch(&self, entry: &SourceEntry) -> Result<SourceDocument> {
        let subject = self
            .nodes
            .get(&entry.identifier)
            .cloned()
            .ok_or_else(|| HarvestError::Source(format!("unknown dataset {}", entry.identifier)))?;
        Ok(SourceDocument::Rdf {
            graph: Arc::clone(&self.graph),
            subject,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    rows: Vec<SearchRow>,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    idno: String,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    changed: Option<String>,
}

/// JSON study catalogue (`{base}search` listing, `{base}{idno}` documents).
#[derive(Debug, Clone)]
pub struct StudyCatalogSource {
    http: Client,
    base_url: String,
    profile: Arc<StudyProfile>,
    local_offset: FixedOffset,
}

impl StudyCatalogSource {
    /// Creates a source for `base_url`, which must end where `search` and
    /// the study ids are appended.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, profile: StudyProfile) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(TIMEOUT).build()?,
            base_url: base_url.into(),
            profile: Arc::new(profile),
            local_offset: cet(),
        })
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Source(format!("GET {url} returned HTTP {status}")));
        }
        Ok(response.json()?)
    }
}

impl SourceCatalog for StudyCatalogSource {
    fn list(&self) -> Result<Vec<SourceEntry>> {
        let search: SearchResponse = self.get_json(&format!("{}search", self.base_url))?;
        Ok(rows_to_entries(search.result.rows, self.local_offset))
    }

    fn fetch(&self, entry: &SourceEntry) -> Result<SourceDocument> {
        let document: StudyDocument =
            self.get_json(&format!("{}{}", self.base_url, entry.identifier))?;
        Ok(SourceDocument::Study {
            document: Box::new(document),
            profile: Arc::clone(&self.profile),
        })
    }
}

fn rows_to_entries(rows: Vec<SearchRow>, offset: FixedOffset) -> Vec<SourceEntry> {
    rows.into_iter()
        .map(|row| SourceEntry {
            created: row.created.as_deref().and_then(|t| parse_timestamp(t, offset)),
            changed: row.changed.as_deref().and_then(|t| parse_timestamp(t, offset)),
            identifier: row.idno,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EXPORT: &str = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .

        <http://ex.org/ds/1> a dcat:Dataset ;
            dct:identifier "https://data.bl.ch/explore/dataset/1/" ;
            dct:issued "2024-01-10T08:00:00+00:00" ;
            dct:modified "2024-03-01 12:00:00" .
        <http://ex.org/ds/2> a dcat:Dataset .
        <http://ex.org/ds/3> a dcat:Dataset ;
            dct:identifier "https://data.bl.ch/explore/dataset/1/" .
    "#;

    #[test]
    fn test_dcat_export_listing() {
        let graph = RdfGraph::parse(EXPORT, RdfFormat::Turtle).unwrap();
        let source = DcatExportSource::from_graph(graph);
        let entries = source.list().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].identifier, "https://data.bl.ch/explore/dataset/1/");
        assert_eq!(
            entries[0].created,
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap())
        );
        assert_eq!(
            entries[0].changed,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap())
        );
        assert_eq!(entries[1].identifier, "http://ex.org/ds/2");
        assert_eq!(entries[1].created, None);

        match source.fetch(&entries[1]).unwrap() {
            SourceDocument::Rdf { subject, .. } => {
                assert_eq!(subject, RdfNode::uri("http://ex.org/ds/2"));
            },
            SourceDocument::Study { .. } => panic!("expected an RDF document"),
        }

        let unknown = SourceEntry {
            identifier: "nope".into(),
            created: None,
            changed: None,
        };
        assert!(matches!(source.fetch(&unknown), Err(HarvestError::Source(_))));
    }

    #[test]
    fn test_search_rows() {
        let json = r#"{"result": {"rows": [
            {"idno": "ABN-1", "created": "2024-05-01 10:00:00", "changed": "2024-05-02T10:00:00+02:00"},
            {"idno": "ABN-2"}
        ]}}"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        let entries = rows_to_entries(search.result.rows, cet());

        assert_eq!(entries[0].identifier, "ABN-1");
        assert_eq!(
            entries[0].created,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
        );
        assert_eq!(
            entries[0].changed,
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap())
        );
        assert_eq!(entries[1].changed, None);
    }
}
