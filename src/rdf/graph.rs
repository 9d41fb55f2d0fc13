//! Parsed RDF graph with subject-indexed lookups.
//!
//! This module wraps the oxrdfio parser in a small graph type tailored for
//! DCAT extraction: triples are kept in document order and indexed by
//! subject, so `objects`, `value` and `contains` do not scan the whole graph.

use std::collections::HashMap;
use std::io::Read;

use oxrdf::{NamedOrBlankNode, Quad, Term};
use oxrdfio::{JsonLdProfileSet, RdfFormat as OxRdfFormat, RdfParser};

use crate::config::RdfFormat;
use crate::error::{HarvestError, Result};

use super::namespaces::{dcat, rdf, xsd};

/// An RDF node (subject or object in a triple).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// A named node (IRI/URI).
    Uri(String),
    /// A blank node with a local identifier.
    BlankNode(String),
    /// A literal value with optional language tag or datatype.
    Literal {
        /// The literal value.
        value: String,
        /// Optional language tag (e.g., "de", "fr").
        language: Option<String>,
        /// Optional datatype URI.
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// Creates a new URI node.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a new blank node.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Creates a new plain literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a new literal with a language tag.
    #[must_use]
    pub fn literal_with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(lang.into()),
            datatype: None,
        }
    }

    /// Returns true if this is a URI node.
    #[must_use]
    pub const fn is_uri(&self) -> bool {
        matches!(self, Self::Uri(_))
    }

    /// Returns true if this is a literal.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Returns the lexical form: the URI, the blank node id, or the literal value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uri(s) | Self::BlankNode(s) => s,
            Self::Literal { value, .. } => value,
        }
    }

    /// Returns the language tag of a literal, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }
}

/// A single RDF triple (subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfTriple {
    /// The subject of the triple.
    pub subject: RdfNode,
    /// The predicate (property) of the triple.
    pub predicate: String,
    /// The object of the triple.
    pub object: RdfNode,
}

impl RdfTriple {
    /// Creates a new RDF triple.
    #[must_use]
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF graph containing triples.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    /// The triples in this graph, in document order.
    triples: Vec<RdfTriple>,
    /// Subject -> positions of its triples in `triples`.
    subject_index: HashMap<RdfNode, Vec<usize>>,
}

impl RdfGraph {
    /// Creates a new empty RDF graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the graph.
    pub fn add_triple(&mut self, triple: RdfTriple) {
        self.subject_index
            .entry(triple.subject.clone())
            .or_default()
            .push(self.triples.len());
        self.triples.push(triple);
    }

    /// Adds a triple from components.
    pub fn add(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) {
        self.add_triple(RdfTriple::new(subject, predicate, object));
    }

    /// Returns the number of triples in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns an iterator over the triples.
    pub fn triples(&self) -> impl Iterator<Item = &RdfTriple> {
        self.triples.iter()
    }

    /// Returns every object of `(subject, predicate, ?)` in document order.
    pub fn objects<'a>(
        &'a self,
        subject: &RdfNode,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a RdfNode> + 'a {
        self.subject_index
            .get(subject)
            .into_iter()
            .flatten()
            .map(|&idx| &self.triples[idx])
            .filter(move |triple| triple.predicate == predicate)
            .map(|triple| &triple.object)
    }

    /// Returns the first object of `(subject, predicate, ?)`.
    #[must_use]
    pub fn value(&self, subject: &RdfNode, predicate: &str) -> Option<&RdfNode> {
        self.subject_index
            .get(subject)?
            .iter()
            .map(|&idx| &self.triples[idx])
            .find(|triple| triple.predicate == predicate)
            .map(|triple| &triple.object)
    }

    /// Returns true if the graph contains `(subject, predicate, object)`.
    #[must_use]
    pub fn contains(&self, subject: &RdfNode, predicate: &str, object: &RdfNode) -> bool {
        self.objects(subject, predicate).any(|o| o == object)
    }

    /// Returns true if `subject` is typed with the class `class_uri`.
    #[must_use]
    pub fn has_type(&self, subject: &RdfNode, class_uri: &str) -> bool {
        self.objects(subject, rdf::TYPE)
            .any(|o| matches!(o, RdfNode::Uri(uri) if uri == class_uri))
    }

    /// Returns all subjects typed with `class_uri`, in document order, without duplicates.
    #[must_use]
    pub fn subjects_of_type(&self, class_uri: &str) -> Vec<&RdfNode> {
        let mut subjects: Vec<&RdfNode> = Vec::new();
        for triple in &self.triples {
            if triple.predicate == rdf::TYPE
                && matches!(&triple.object, RdfNode::Uri(uri) if uri == class_uri)
                && !subjects.contains(&&triple.subject)
            {
                subjects.push(&triple.subject);
            }
        }
        subjects
    }

    /// Returns the `dcat:Dataset` nodes of the graph in document order.
    #[must_use]
    pub fn dataset_nodes(&self) -> Vec<&RdfNode> {
        self.subjects_of_type(dcat::DATASET)
    }

    /// Parses an RDF graph from a reader in the specified format.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RdfParse`] if the document is not valid RDF.
    pub fn parse_from_reader<R: Read>(reader: R, format: RdfFormat) -> Result<Self> {
        let parser = RdfParser::from_format(to_oxrdf_format(format)).for_reader(reader);

        let mut graph = Self::new();
        for result in parser {
            let quad = result.map_err(|e| HarvestError::RdfParse(e.to_string()))?;
            graph.add_triple(from_oxrdf_quad(&quad)?);
        }

        log::debug!("Parsed {} triples ({format})", graph.len());
        Ok(graph)
    }

    /// Parses an RDF graph from a string.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RdfParse`] if the document is not valid RDF.
    pub fn parse(input: &str, format: RdfFormat) -> Result<Self> {
        Self::parse_from_reader(input.as_bytes(), format)
    }
}

/// Converts our [`RdfFormat`] to oxrdfio's format.
fn to_oxrdf_format(format: RdfFormat) -> OxRdfFormat {
    match format {
        RdfFormat::RdfXml => OxRdfFormat::RdfXml,
        RdfFormat::JsonLd => OxRdfFormat::JsonLd {
            profile: JsonLdProfileSet::default(),
        },
        RdfFormat::Turtle => OxRdfFormat::Turtle,
        RdfFormat::NTriples => OxRdfFormat::NTriples,
    }
}

/// Converts an oxrdf Quad to our [`RdfTriple`], dropping the graph name.
fn from_oxrdf_quad(quad: &Quad) -> Result<RdfTriple> {
    let subject = match &quad.subject {
        NamedOrBlankNode::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        NamedOrBlankNode::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(HarvestError::RdfParse("Unsupported subject type".into()));
        },
    };

    let object = match &quad.object {
        Term::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        Term::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        Term::Literal(lit) => {
            let language = lit.language().map(String::from);
            let datatype = if language.is_none() && lit.datatype().as_str() != xsd::STRING {
                Some(lit.datatype().as_str().to_string())
            } else {
                None
            };
            RdfNode::Literal {
                value: lit.value().to_string(),
                language,
                datatype,
            }
        },
        #[allow(unreachable_patterns)]
        _ => {
            return Err(HarvestError::RdfParse("Unsupported object type".into()));
        },
    };

    Ok(RdfTriple::new(
        subject,
        quad.predicate.as_str().to_string(),
        object,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::namespaces::dcterms;

    const TURTLE: &str = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .

        <http://example.org/ds/1> a dcat:Dataset ;
            dct:title "Luftqualität"@de, "Air quality"@en ;
            dct:identifier "1@kanton" ;
            dcat:distribution [ dct:format <http://example.org/csv> ] .

        <http://example.org/ds/2> a dcat:Dataset .
    "#;

    #[test]
    fn test_rdf_node_construction() {
        assert!(RdfNode::uri("http://example.org/foo").is_uri());
        assert!(RdfNode::literal("hello").is_literal());
        assert_eq!(RdfNode::blank("b1").as_str(), "b1");

        let lang_lit = RdfNode::literal_with_lang("hallo", "de");
        assert_eq!(lang_lit.language(), Some("de"));
        assert_eq!(lang_lit.as_str(), "hallo");
    }

    #[test]
    fn test_graph_lookups() {
        let mut graph = RdfGraph::new();
        assert!(graph.is_empty());

        let subj = RdfNode::uri("http://example.org/ds");
        graph.add(subj.clone(), rdf::TYPE, RdfNode::uri(dcat::DATASET));
        graph.add(subj.clone(), dcterms::TITLE, RdfNode::literal("A"));
        graph.add(subj.clone(), dcterms::TITLE, RdfNode::literal("B"));

        assert_eq!(graph.len(), 3);
        let titles: Vec<&str> = graph
            .objects(&subj, dcterms::TITLE)
            .map(RdfNode::as_str)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(
            graph.value(&subj, dcterms::TITLE),
            Some(&RdfNode::literal("A"))
        );
        assert!(graph.has_type(&subj, dcat::DATASET));
        assert!(graph.contains(&subj, dcterms::TITLE, &RdfNode::literal("B")));
        assert!(graph
            .value(&RdfNode::uri("http://example.org/other"), dcterms::TITLE)
            .is_none());
    }

    #[test]
    fn test_value_outlives_predicate() {
        let graph = RdfGraph::parse(TURTLE, RdfFormat::Turtle).expect("parsing failed");
        let subj = RdfNode::uri("http://example.org/ds/1");

        let identifier = {
            let predicate = format!("{}identifier", "http://purl.org/dc/terms/");
            graph.value(&subj, &predicate)
        };
        assert_eq!(identifier.map(RdfNode::as_str), Some("1@kanton"));
    }

    #[test]
    fn test_parse_turtle() {
        let graph = RdfGraph::parse(TURTLE, RdfFormat::Turtle).expect("parsing failed");

        let datasets = graph.dataset_nodes();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0], &RdfNode::uri("http://example.org/ds/1"));

        let languages: Vec<Option<&str>> = graph
            .objects(datasets[0], dcterms::TITLE)
            .map(RdfNode::language)
            .collect();
        assert_eq!(languages, vec![Some("de"), Some("en")]);

        let dist = graph
            .value(datasets[0], dcat::DISTRIBUTION)
            .expect("distribution");
        assert!(matches!(dist, RdfNode::BlankNode(_)));
        assert_eq!(
            graph.value(dist, dcterms::FORMAT),
            Some(&RdfNode::uri("http://example.org/csv"))
        );
    }

    #[test]
    fn test_parse_rdf_xml() {
        let xml = r#"<?xml version="1.0"?>
            <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                     xmlns:dcat="http://www.w3.org/ns/dcat#"
                     xmlns:dct="http://purl.org/dc/terms/">
              <dcat:Dataset rdf:about="http://example.org/ds/9">
                <dct:title xml:lang="fr">Qualité de l'air</dct:title>
              </dcat:Dataset>
            </rdf:RDF>"#;
        let graph = RdfGraph::parse(xml, RdfFormat::RdfXml).expect("parsing failed");
        let subj = RdfNode::uri("http://example.org/ds/9");
        assert!(graph.has_type(&subj, dcat::DATASET));
        assert_eq!(
            graph.value(&subj, dcterms::TITLE).and_then(RdfNode::language),
            Some("fr")
        );
    }

    #[test]
    fn test_parse_error() {
        let result = RdfGraph::parse("<http://example.org/a> <broken", RdfFormat::Turtle);
        assert!(matches!(result, Err(HarvestError::RdfParse(_))));
    }
}
