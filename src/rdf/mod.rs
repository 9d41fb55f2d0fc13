//! RDF input layer.
//!
//! - [`RdfGraph`] holds a parsed source document (RDF/XML, Turtle,
//!   N-Triples or JSON-LD) with a subject index.
//! - [`GraphAccessor`] provides the typed lookups the extractors use:
//!   single literals, dates, normalized URIs, linked resources and
//!   per-language literal maps.
//! - [`namespaces`] lists the vocabulary terms that are read.

mod accessor;
mod graph;
pub mod namespaces;

pub use accessor::{is_valid_uri, normalize_uri, strip_html, GraphAccessor};
pub use graph::{RdfGraph, RdfNode, RdfTriple};
