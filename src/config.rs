//! Configuration options for harvesting and synchronization.
//!
//! This module provides the [`HarvestConfig`] struct which carries everything the
//! extractors and the synchronizer need: the publishing organization, the
//! supported languages, exclusion sets, vocabulary tables and worker limits.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::ledger::Ledger;
use crate::mapping::record::{LangMap, Publisher};
use crate::vocab::VocabularyTables;

/// Default number of concurrent synchronization jobs.
///
/// The remote catalogue serializes index writes; higher values trade
/// throughput for write-lock contention.
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Input format of a source RDF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RdfFormat {
    /// RDF/XML format (application/rdf+xml) - what most DCAT exports emit
    #[default]
    RdfXml,
    /// JSON-LD format (application/ld+json)
    JsonLd,
    /// Turtle format (text/turtle)
    Turtle,
    /// N-Triples format (application/n-triples)
    NTriples,
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::JsonLd => write!(f, "JSON-LD"),
            Self::Turtle => write!(f, "Turtle"),
            Self::NTriples => write!(f, "N-Triples"),
        }
    }
}

impl RdfFormat {
    /// Returns the MIME type for this RDF format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::JsonLd => "application/ld+json",
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
        }
    }

    /// Guesses the format from a file extension (`xml`, `rdf`, `ttl`, ...).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xml" | "rdf" | "owl" => Some(Self::RdfXml),
            "jsonld" | "json-ld" => Some(Self::JsonLd),
            "ttl" | "turtle" => Some(Self::Turtle),
            "nt" | "ntriples" => Some(Self::NTriples),
            _ => None,
        }
    }
}

impl FromStr for RdfFormat {
    type Err = HarvestError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_extension(name)
            .ok_or_else(|| HarvestError::Config(format!("unknown RDF format {name:?}")))
    }
}

/// How the synchronizer computes the cutoff that separates changed records
/// from unchanged ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPolicy {
    /// Use the watermark stored in the ledger by the last successful run.
    #[default]
    SinceLastRun,
    /// Use a fixed window ending at the start of the current run.
    Lookback {
        /// Window length in hours (24 means "since yesterday").
        hours: i64,
    },
}

impl WatermarkPolicy {
    /// Computes the cutoff for a run starting at `now`.
    ///
    /// Returns `None` when no cutoff is known yet, in which case every
    /// source record counts as new.
    #[must_use]
    pub fn cutoff(&self, ledger: &Ledger, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::SinceLastRun => ledger.watermark(),
            Self::Lookback { hours } => Some(now - Duration::hours(*hours)),
        }
    }
}

/// Follow-up calls issued after a record was created remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSettings {
    /// Publication level to set (e.g. `Public`).
    pub level: Option<String>,
    /// Registration status to set (e.g. `Registered`).
    pub registration_status: Option<String>,
}

/// Configuration for extraction and synchronization.
///
/// # Examples
///
/// ```ignore
/// use dcat_harvester::HarvestConfig;
///
/// let config = HarvestConfig::new("CH_KT_BL")
///     .with_languages(["de", "en"])
///     .with_max_workers(1);
/// ```
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Organization id used to namespace rewritten identifiers
    /// (`{ORG}_dataset_{N}`) and as the default publisher.
    pub organization_id: String,

    /// Languages kept in multilingual fields, in preference order.
    pub supported_languages: Vec<String>,

    /// Language used for contact names given as plain literals.
    pub contact_language: String,

    /// Publisher attached to every extracted dataset.
    pub default_publisher: Publisher,

    /// Access rights code attached to every extracted dataset.
    pub access_rights: String,

    /// Media type codes (lowercase) that make a distribution invalid.
    pub excluded_media_types: BTreeSet<String>,

    /// Format codes that make a distribution invalid.
    pub excluded_format_codes: BTreeSet<String>,

    /// Controlled vocabulary lookups.
    pub vocabulary: VocabularyTables,

    /// Placeholder used when a distribution has no title in any supported language.
    pub default_distribution_title: String,

    /// Placeholder used when a distribution has no description.
    pub default_distribution_description: String,

    /// Maximum number of concurrent synchronization jobs (at least 1).
    pub max_workers: usize,

    /// Cutoff computation for change detection.
    pub watermark: WatermarkPolicy,

    /// Calls issued after a successful create.
    pub publication: PublicationSettings,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new("CH_KT_BL")
    }
}

impl HarvestConfig {
    /// Creates a configuration for the given organization with default values.
    #[must_use]
    pub fn new(organization_id: impl Into<String>) -> Self {
        let organization_id = organization_id.into();
        Self {
            default_publisher: Publisher::from_identifier(organization_id.clone()),
            organization_id,
            supported_languages: ["de", "fr", "it", "en"]
                .into_iter()
                .map(String::from)
                .collect(),
            contact_language: "de".to_string(),
            access_rights: "PUBLIC".to_string(),
            excluded_media_types: BTreeSet::from(["application/pdf".to_string()]),
            excluded_format_codes: BTreeSet::from(["PDF".to_string()]),
            vocabulary: VocabularyTables::default(),
            default_distribution_title: "Distribution".to_string(),
            default_distribution_description: "Distribution".to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            watermark: WatermarkPolicy::default(),
            publication: PublicationSettings::default(),
        }
    }

    /// Sets the supported languages.
    #[must_use]
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default publisher.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Publisher) -> Self {
        self.default_publisher = publisher;
        self
    }

    /// Sets the worker limit. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Sets the watermark policy.
    #[must_use]
    pub const fn with_watermark(mut self, policy: WatermarkPolicy) -> Self {
        self.watermark = policy;
        self
    }

    /// Sets the follow-up publication calls.
    #[must_use]
    pub fn with_publication(mut self, publication: PublicationSettings) -> Self {
        self.publication = publication;
        self
    }

    /// Adds a media type to the exclusion set.
    #[must_use]
    pub fn exclude_media_type(mut self, media_type: &str) -> Self {
        self.excluded_media_types
            .insert(media_type.to_ascii_lowercase());
        self
    }

    /// Adds a format code to the exclusion set.
    #[must_use]
    pub fn exclude_format_code(mut self, code: &str) -> Self {
        self.excluded_format_codes.insert(code.to_ascii_uppercase());
        self
    }

    /// Returns a map with every supported language set to `value`.
    #[must_use]
    pub fn all_languages(&self, value: &str) -> LangMap {
        self.supported_languages
            .iter()
            .map(|lang| (lang.clone(), value.to_string()))
            .collect()
    }
}
