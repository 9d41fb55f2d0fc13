#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # dcat-harvester
//!
//! Harvests open-data catalogue records, maps them to the target metadata
//! schema and synchronizes them into a central catalogue.
//!
//! ## Quick Start
//!
//! ### Mapping a DCAT export
//!
//! ```ignore
//! use dcat_harvester::{extract_catalog, HarvestConfig, RdfFormat, RdfGraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = RdfGraph::parse(&std::fs::read_to_string("catalog.ttl")?, RdfFormat::Turtle)?;
//! let config = HarvestConfig::new("CH_KT_BL");
//!
//! for extraction in extract_catalog(&graph, &config) {
//!     if let Some(dataset) = extraction.outcome.mapped() {
//!         println!("{}", dataset.to_document()?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Synchronizing
//!
//! ```ignore
//! use dcat_harvester::{DcatExportSource, HarvestConfig, HttpCatalogClient, Ledger, Synchronizer};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::new("CH_KT_BL");
//! let source = DcatExportSource::from_path(Path::new("catalog.rdf"))?;
//! let client = HttpCatalogClient::new("https://api.example.org/partner/v1", "token")?;
//!
//! let summary = Synchronizer::new(&config, &source, &client)
//!     .run_with_store(Path::new("ledger.json"), Ledger::new())?;
//! summary.into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`rdf`] — Parsed RDF graphs and typed accessors
//! - [`mapping`] — Dataset and distribution extraction, study mapping, pruning
//! - [`vocab`] — Controlled vocabulary lookups
//! - [`ledger`] — Source id to remote id reconciliation table
//! - [`sync`] — Planning, worker pool and run summary
//! - [`source`] — Source catalogues
//! - [`remote`] — Remote catalogue client
//! - [`config`] — Harvest configuration
//! - [`dates`] — Date normalization
//! - [`error`] — Error types and result type

pub mod config;
pub mod dates;
pub mod error;
pub mod ledger;
pub mod mapping;
pub mod rdf;
pub mod remote;
pub mod source;
pub mod sync;
pub mod vocab;

pub use config::{HarvestConfig, PublicationSettings, RdfFormat, WatermarkPolicy};
pub use error::{HarvestError, Result};
pub use ledger::{EntryStatus, Ledger, LedgerDelta, LedgerEntry};
pub use mapping::study::{StudyDocument, StudyProfile};
pub use mapping::{
    extract_catalog, extract_dataset, extract_distribution, DatasetRecord, Distribution,
    Extraction, MappedDataset, MappingOutcome, MappingWarning, Rejection,
};
pub use rdf::{GraphAccessor, RdfGraph, RdfNode};
pub use remote::{CatalogClient, HttpCatalogClient};
pub use source::{
    DcatExportSource, SourceCatalog, SourceDocument, SourceEntry, StudyCatalogSource,
};
pub use sync::{RunSummary, SyncReport, Synchronizer};
pub use vocab::VocabularyTables;
