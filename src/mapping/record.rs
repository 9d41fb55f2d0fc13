//! Target catalogue schema.
//!
//! These types serialize to the JSON document expected by the remote
//! catalogue (camelCase keys). Optional and empty values are removed from the
//! final document by [`super::prune`], so the structs can stay close to the
//! schema without `skip_serializing_if` on every field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HarvestConfig;
use crate::error::Result;

use super::prune::prune;

/// Language code → text.
pub type LangMap = IndexMap<String, String>;

/// A controlled vocabulary code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    /// The code value.
    pub code: String,
}

impl Code {
    /// Wraps a code value.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A URI with an optional multilingual label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedResource {
    /// Target URI.
    pub uri: String,
    /// Label per language.
    #[serde(default)]
    pub label: LangMap,
}

impl LinkedResource {
    /// A resource without label.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: LangMap::new(),
        }
    }
}

/// Publishing (or attributed) organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// Remote catalogue id of the organization, when known.
    #[serde(default)]
    pub id: Option<String>,
    /// Organization identifier (e.g. `CH_KT_BL`).
    pub identifier: String,
    /// Display name per language.
    #[serde(default)]
    pub name: LangMap,
}

impl Publisher {
    /// A publisher referenced only by identifier.
    #[must_use]
    pub fn from_identifier(identifier: impl Into<String>) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            name: LangMap::new(),
        }
    }
}

/// Start/end pair of a temporal coverage entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (ISO 8601).
    pub start: Option<String>,
    /// End date (ISO 8601).
    pub end: Option<String>,
}

/// vCard contact of a dataset.
///
/// Unlike every other multilingual field, `fn`, `hasAddress` and `note`
/// carry all supported languages, with empty strings for missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    /// Formatted name.
    #[serde(rename = "fn")]
    pub name: LangMap,
    /// Postal address.
    pub has_address: LangMap,
    /// Email address without `mailto:`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_email: Option<String>,
    /// Phone number without `tel:`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_telephone: Option<String>,
    /// vCard kind, always `Organization`.
    pub kind: String,
    /// Free-text note.
    pub note: LangMap,
}

impl ContactPoint {
    /// An empty contact carrying every supported language.
    #[must_use]
    pub fn empty(config: &HarvestConfig) -> Self {
        Self {
            name: config.all_languages(""),
            has_address: config.all_languages(""),
            has_email: None,
            has_telephone: None,
            kind: "Organization".to_string(),
            note: config.all_languages(""),
        }
    }
}

/// Checksum of a distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    /// Hash algorithm code.
    pub algorithm: Option<Code>,
    /// Hex digest.
    pub checksum_value: Option<String>,
}

/// Reference to a data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    /// Service URI.
    pub id: String,
}

/// A qualified relation (`prov:qualifiedRelation`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedRelation {
    /// Role code, e.g. `original`.
    pub had_role: Code,
    /// Related resource.
    pub relation: LinkedResource,
}

/// A qualified attribution (`prov:qualifiedAttribution`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedAttribution {
    /// Attributed organization.
    pub agent: Publisher,
    /// Role code, e.g. `distributor`.
    pub had_role: Code,
}

/// One downloadable or accessible representation of a dataset.
///
/// Field names mirror the target schema.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Distribution {
    pub title: LangMap,
    pub description: LangMap,
    pub format: Option<Code>,
    pub media_type: Option<Code>,
    pub access_url: Option<LinkedResource>,
    pub download_url: Option<LinkedResource>,
    pub license: Option<Code>,
    pub availability: Option<Code>,
    pub issued: Option<String>,
    pub modified: Option<String>,
    pub rights: Option<String>,
    pub access_services: Vec<ServiceRef>,
    pub byte_size: Option<u64>,
    pub checksum: Option<Checksum>,
    pub conforms_to: Vec<LinkedResource>,
    pub coverage: Vec<DateRange>,
    pub documentation: Vec<LinkedResource>,
    pub identifier: Option<String>,
    pub images: Vec<LinkedResource>,
    pub languages: Vec<Code>,
    pub packaging_format: Option<Code>,
    pub spatial_resolution: Option<String>,
    pub temporal_resolution: Option<String>,
}

impl Distribution {
    /// Returns true if the distribution may be published.
    ///
    /// A distribution needs a media type that is not excluded, and a format
    /// that is either absent or not excluded.
    #[must_use]
    pub fn is_valid(&self, config: &HarvestConfig) -> bool {
        let Some(media_type) = &self.media_type else {
            return false;
        };
        if config
            .excluded_media_types
            .contains(&media_type.code.to_ascii_lowercase())
        {
            return false;
        }
        self.format
            .as_ref()
            .map_or(true, |format| !config.excluded_format_codes.contains(&format.code))
    }
}

/// A dataset in the target schema.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetRecord {
    /// Identifiers; the first one is primary.
    pub identifiers: Vec<String>,
    pub title: LangMap,
    pub description: LangMap,
    pub access_rights: Code,
    pub issued: Option<String>,
    pub modified: Option<String>,
    pub publisher: Publisher,
    pub landing_pages: Vec<LinkedResource>,
    pub keywords: Vec<LangMap>,
    pub distributions: Vec<Distribution>,
    pub languages: Vec<Code>,
    pub contact_points: Vec<ContactPoint>,
    pub documentation: Vec<LinkedResource>,
    pub images: Vec<LinkedResource>,
    pub temporal_coverage: Vec<DateRange>,
    pub frequency: Option<Code>,
    pub is_referenced_by: Vec<LinkedResource>,
    pub relations: Vec<LinkedResource>,
    pub spatial: Vec<String>,
    pub version: Option<String>,
    pub version_notes: LangMap,
    pub conforms_to: Vec<LinkedResource>,
    pub themes: Vec<Code>,
    pub qualified_relations: Vec<QualifiedRelation>,
    pub qualified_attributions: Vec<QualifiedAttribution>,
    pub confidentiality_person: Option<Code>,
}

/// A dataset accepted by an extractor, ready to be sent to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedDataset {
    /// The first identifier of the record.
    pub primary_identifier: String,
    /// The mapped record.
    pub record: DatasetRecord,
}

impl MappedDataset {
    /// Wraps a record; the primary identifier is its first identifier.
    #[must_use]
    pub fn new(record: DatasetRecord) -> Self {
        Self {
            primary_identifier: record.identifiers.first().cloned().unwrap_or_default(),
            record,
        }
    }

    /// Serializes the record, prunes empty values and wraps it under `"data"`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HarvestError::Json`] if serialization fails.
    pub fn to_document(&self) -> Result<Value> {
        let mut data = serde_json::to_value(&self.record)?;
        prune(&mut data);
        Ok(serde_json::json!({ "data": data }))
    }
}
