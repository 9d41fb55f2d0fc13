//! Common test helpers shared across the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use dcat_harvester::{
    CatalogClient, DcatExportSource, HarvestError, RdfFormat, RdfGraph, Result, SourceCatalog,
    SourceDocument, SourceEntry,
};
use serde_json::Value;

/// Prefixes used by every Turtle fixture.
pub const PREFIXES: &str = r#"
    @prefix dcat: <http://www.w3.org/ns/dcat#> .
    @prefix dct: <http://purl.org/dc/terms/> .
    @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
    @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
    @prefix vcard: <http://www.w3.org/2006/vcard/ns#> .
    @prefix spdx: <http://spdx.org/rdf/terms#> .
"#;

/// IANA registry URI of a media type.
pub fn iana(media_type: &str) -> String {
    format!("<https://www.iana.org/assignments/media-types/{media_type}>")
}

/// Parses a Turtle body after prepending [`PREFIXES`].
pub fn parse_turtle(body: &str) -> RdfGraph {
    RdfGraph::parse(&format!("{PREFIXES}{body}"), RdfFormat::Turtle)
        .unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

/// A publishable dataset with one CSV distribution.
pub fn valid_dataset(identifier: &str) -> String {
    format!(
        r#"<http://ex.org/ds/{identifier}> a dcat:Dataset ;
            dct:identifier "{identifier}" ;
            dct:title "Titel {identifier}"@de ;
            dct:description "Beschreibung {identifier}"@de ;
            dcat:distribution [
                dct:title "CSV"@de ;
                dcat:mediaType {csv} ;
                dcat:downloadURL <https://data.example.org/{identifier}.csv>
            ] .
        "#,
        csv = iana("text/csv")
    )
}

/// A catalogue holding one valid dataset per identifier.
pub fn catalog(identifiers: &[&str]) -> RdfGraph {
    let body: String = identifiers.iter().map(|id| valid_dataset(id)).collect();
    parse_turtle(&body)
}

/// Source over a parsed export whose timestamps tests can move.
pub struct FakeSource {
    export: DcatExportSource,
    entries: Mutex<Vec<SourceEntry>>,
}

impl FakeSource {
    pub fn new(graph: RdfGraph) -> Self {
        let export = DcatExportSource::from_graph(graph);
        let entries = export.list().expect("export listing");
        Self {
            export,
            entries: Mutex::new(entries),
        }
    }

    /// Marks a record as modified at `changed`.
    pub fn touch(&self, identifier: &str, changed: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.identifier == identifier)
            .expect("known identifier");
        entry.changed = Some(changed);
    }
}

impl SourceCatalog for FakeSource {
    fn list(&self) -> Result<Vec<SourceEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }

    fn fetch(&self, entry: &SourceEntry) -> Result<SourceDocument> {
        self.export.fetch(entry)
    }
}

/// In-memory remote catalogue that records every call as `"{op} {key}"`.
///
/// Creates are keyed by the primary identifier and answer `remote-{id}`;
/// every other call is keyed by the remote id.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the call rendered as `call` (e.g. `"create B"`) fail.
    pub fn fail_on(&self, call: &str) {
        self.failing.lock().unwrap().insert(call.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls sorted, for assertions that do not depend on job order.
    pub fn sorted_calls(&self) -> Vec<String> {
        let mut calls = self.calls();
        calls.sort();
        calls
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, operation: &'static str, key: &str) -> Result<()> {
        let call = format!("{operation} {key}");
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&call) {
            return Err(HarvestError::RemoteCall {
                operation,
                status: Some(500),
                message: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogClient for RecordingClient {
    fn get(&self, id: &str) -> Result<Value> {
        self.record("get", id)?;
        Ok(Value::Null)
    }

    fn create(&self, document: &Value) -> Result<String> {
        let identifier = document["data"]["identifiers"][0]
            .as_str()
            .unwrap_or_default()
            .to_string();
        self.record("create", &identifier)?;
        Ok(format!("remote-{identifier}"))
    }

    fn update(&self, id: &str, _document: &Value) -> Result<()> {
        self.record("update", id)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.record("delete", id)
    }

    fn set_publication_level(&self, id: &str, _level: &str) -> Result<()> {
        self.record("level", id)
    }

    fn set_registration_status(&self, id: &str, _status: &str) -> Result<()> {
        self.record("status", id)
    }
}
