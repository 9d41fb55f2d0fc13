//! Mapping from source documents to the target catalogue schema.
//!
//! - [`extract_dataset`] and [`extract_distribution`] map DCAT graph nodes.
//! - [`extract_catalog`] maps every dataset of a graph in parallel.
//! - [`study`] maps JSON study documents.
//!
//! A dataset that does not qualify for publication is not an error: it comes
//! back as [`MappingOutcome::Rejected`]. Problems that only affect one field
//! are reported as [`MappingWarning`]s next to the outcome.

use std::fmt;

use rayon::prelude::*;

use crate::config::HarvestConfig;
use crate::rdf::{GraphAccessor, RdfGraph};

mod dataset;
mod distribution;
pub mod prune;
pub mod record;
pub mod study;

pub use dataset::{extract_dataset, rewrite_identifier};
pub use distribution::extract_distribution;
pub use record::{DatasetRecord, Distribution, MappedDataset};

/// Why a dataset was not mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// None of the distributions has an accepted media type.
    NoValidDistributions,
    /// The description is empty in every supported language.
    EmptyDescription,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValidDistributions => write!(f, "no valid distributions"),
            Self::EmptyDescription => write!(f, "empty description"),
        }
    }
}

/// Result of mapping one source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// The record was mapped.
    Mapped(Box<MappedDataset>),
    /// The record does not qualify for publication.
    Rejected(Rejection),
}

impl MappingOutcome {
    /// Returns the mapped dataset, if any.
    #[must_use]
    pub fn mapped(&self) -> Option<&MappedDataset> {
        match self {
            Self::Mapped(dataset) => Some(dataset),
            Self::Rejected(_) => None,
        }
    }
}

/// A recoverable problem found while mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingWarning {
    /// A `dcterms:relation` segment was not a URI and was skipped.
    InvalidRelationUri {
        /// Primary identifier of the dataset.
        dataset: String,
        /// The rejected segment.
        segment: String,
    },
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRelationUri { dataset, segment } => {
                write!(f, "{dataset}: skipped invalid relation URI '{segment}'")
            },
        }
    }
}

/// Outcome of mapping one record plus the warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Mapped or rejected.
    pub outcome: MappingOutcome,
    /// Field-level problems.
    pub warnings: Vec<MappingWarning>,
}

impl Extraction {
    /// A rejection without warnings.
    #[must_use]
    pub const fn rejected(reason: Rejection) -> Self {
        Self {
            outcome: MappingOutcome::Rejected(reason),
            warnings: Vec::new(),
        }
    }

    /// A mapped dataset without warnings.
    #[must_use]
    pub fn mapped(dataset: MappedDataset) -> Self {
        Self {
            outcome: MappingOutcome::Mapped(Box::new(dataset)),
            warnings: Vec::new(),
        }
    }
}

/// Maps every `dcat:Dataset` node of `graph`, in document order.
///
/// Datasets are independent, so they are mapped in parallel.
#[must_use]
pub fn extract_catalog(graph: &RdfGraph, config: &HarvestConfig) -> Vec<Extraction> {
    let acc = GraphAccessor::new(graph, config);
    let nodes = graph.dataset_nodes();
    log::info!("Mapping {} datasets", nodes.len());

    nodes
        .par_iter()
        .map(|node| extract_dataset(&acc, node))
        .collect()
}
