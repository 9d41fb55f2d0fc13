//! Mapping of JSON study documents.
//!
//! Study catalogues publish one JSON document per study. The document is
//! deserialized into the typed structs below (every level defaults when
//! absent) and mapped with the help of a [`StudyProfile`], which carries the
//! values the documents do not: publisher, attribution, themes, access
//! rights and the repository the studies live in.
//!
//! Study datasets are not gated on distribution validity; their single
//! distribution points at the repository and has no media type.

use serde::{Deserialize, Serialize};

use crate::config::HarvestConfig;
use crate::dates::normalize_date;
use crate::error::{HarvestError, Result};
use crate::rdf::strip_html;

use super::record::{
    Code, ContactPoint, DatasetRecord, DateRange, Distribution, LangMap, LinkedResource,
    MappedDataset, Publisher, QualifiedAttribution, QualifiedRelation,
};

/// Root of a study document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyDocument {
    /// The study.
    pub dataset: StudyDataset,
}

/// Study entry with catalogue timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyDataset {
    /// Creation timestamp.
    pub created: Option<String>,
    /// Last modification timestamp.
    pub changed: Option<String>,
    /// Public page of the study.
    pub link_study: Option<String>,
    /// Descriptive metadata.
    pub metadata: StudyMetadata,
}

/// Descriptive metadata of a study.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyMetadata {
    pub study_desc: StudyDescription,
    pub doc_desc: DocDescription,
    pub tags: Vec<StudyTag>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyDescription {
    pub title_statement: TitleStatement,
    pub study_info: StudyInfo,
    pub distribution_statement: DistributionStatement,
    pub data_access: DataAccess,
    pub version_statement: VersionStatement,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TitleStatement {
    pub idno: Option<String>,
    pub title: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyInfo {
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub keywords: Vec<StudyKeyword>,
    pub coll_dates: Vec<CollectionDates>,
    pub geog_coverage: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyKeyword {
    pub keyword: String,
}

/// Data collection period.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectionDates {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DistributionStatement {
    pub contact: Vec<StudyContact>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyContact {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataAccess {
    pub dataset_use: DatasetUse,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetUse {
    pub conditions: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocDescription {
    pub version_statement: VersionStatement,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionStatement {
    pub version: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudyTag {
    pub tag: String,
}

/// Values attached to every study of one source catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyProfile {
    /// Language of the study texts.
    pub language: String,
    /// Access rights code.
    pub access_rights: String,
    /// Publisher of the studies.
    pub publisher: Publisher,
    /// Organization credited as distributor.
    pub attribution: Option<QualifiedAttribution>,
    /// Theme codes.
    pub themes: Vec<String>,
    /// Repository holding the studies; used as access URL and original relation.
    pub repository: Option<LinkedResource>,
    /// Tag that marks studies involving persons.
    pub person_tag: String,
}

impl Default for StudyProfile {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            access_rights: "RESTRICTED".to_string(),
            publisher: Publisher::default(),
            attribution: None,
            themes: Vec::new(),
            repository: None,
            person_tag: "Humans".to_string(),
        }
    }
}

impl StudyProfile {
    fn text(&self, value: Option<&String>) -> LangMap {
        value
            .map(|v| strip_html(v))
            .filter(|v| !v.is_empty())
            .map(|v| LangMap::from([(self.language.clone(), v)]))
            .unwrap_or_default()
    }
}

/// Maps a study document.
///
/// # Errors
///
/// Returns [`HarvestError::Source`] if the document has no `idno`.
pub fn map_study(
    document: &StudyDocument,
    profile: &StudyProfile,
    config: &HarvestConfig,
) -> Result<MappedDataset> {
    let dataset = &document.dataset;
    let desc = &dataset.metadata.study_desc;
    let idno = desc
        .title_statement
        .idno
        .as_deref()
        .map(str::trim)
        .filter(|idno| !idno.is_empty())
        .ok_or_else(|| HarvestError::Source("study document without idno".into()))?;

    let coverage: Vec<DateRange> = desc
        .study_info
        .coll_dates
        .iter()
        .map(|dates| DateRange {
            start: dates.start.clone(),
            end: dates.end.clone(),
        })
        .collect();

    let contains_person = dataset
        .metadata
        .tags
        .iter()
        .any(|tag| tag.tag == profile.person_tag);

    let distribution = Distribution {
        title: profile.text(desc.title_statement.title.as_ref()),
        description: profile.text(desc.data_access.dataset_use.conditions.as_ref()),
        access_url: profile.repository.clone(),
        coverage: coverage.clone(),
        ..Distribution::default()
    };

    let record = DatasetRecord {
        identifiers: vec![idno.to_string()],
        title: profile.text(desc.title_statement.title.as_ref()),
        description: profile.text(desc.study_info.summary.as_ref()),
        access_rights: Code::new(profile.access_rights.as_str()),
        issued: dataset.created.as_deref().map(normalize_date),
        modified: dataset.changed.as_deref().map(normalize_date),
        publisher: profile.publisher.clone(),
        landing_pages: dataset
            .link_study
            .iter()
            .map(LinkedResource::new)
            .collect(),
        keywords: desc
            .study_info
            .keywords
            .iter()
            .map(|k| profile.text(Some(&k.keyword)))
            .filter(|k| !k.is_empty())
            .collect(),
        distributions: vec![distribution],
        contact_points: desc
            .distribution_statement
            .contact
            .iter()
            .map(|contact| {
                let mut point = ContactPoint::empty(config);
                if let Some(name) = contact.name.as_deref().filter(|n| !n.is_empty()) {
                    point.name.insert(profile.language.clone(), name.to_string());
                }
                point.has_email = contact.email.clone();
                point
            })
            .collect(),
        temporal_coverage: coverage,
        spatial: desc.study_info.geog_coverage.iter().cloned().collect(),
        version: dataset.metadata.doc_desc.version_statement.version.clone(),
        version_notes: profile.text(desc.version_statement.version.as_ref()),
        themes: profile.themes.iter().map(Code::new).collect(),
        qualified_relations: profile
            .repository
            .iter()
            .map(|repository| QualifiedRelation {
                had_role: Code::new("original"),
                relation: LinkedResource::new(repository.uri.clone()),
            })
            .collect(),
        qualified_attributions: profile.attribution.iter().cloned().collect(),
        confidentiality_person: Some(Code::new(if contains_person {
            "person"
        } else {
            "no_person"
        })),
        ..DatasetRecord::default()
    };

    log::debug!("Mapped study {idno}");
    Ok(MappedDataset::new(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDY: &str = r#"{
        "dataset": {
            "created": "2024-02-01 09:30:00",
            "changed": "2024-03-05 16:00:00",
            "link_study": "https://studies.example.org/catalog/17",
            "metadata": {
                "study_desc": {
                    "title_statement": {"idno": "ABN-2023", "title": "Antibiotic use"},
                    "study_info": {
                        "abstract": "<p>Survey</p> of antibiotic use",
                        "keywords": [{"keyword": "antibiotics"}, {"keyword": ""}],
                        "coll_dates": [{"start": "2023-01-01", "end": "2023-06-30"}],
                        "geog_coverage": "Switzerland"
                    },
                    "distribution_statement": {"contact": [{"name": "Study team", "email": "team@example.org"}]},
                    "data_access": {"dataset_use": {"conditions": "On request"}}
                },
                "doc_desc": {"version_statement": {"version": "2"}},
                "tags": [{"tag": "Humans"}]
            }
        }
    }"#;

    fn profile() -> StudyProfile {
        StudyProfile {
            publisher: Publisher::from_identifier("CH_BLV"),
            themes: vec!["114".into()],
            repository: Some(LinkedResource::new("https://studies.example.org/catalog")),
            ..StudyProfile::default()
        }
    }

    #[test]
    fn test_map_study() {
        let document: StudyDocument = serde_json::from_str(STUDY).unwrap();
        let config = HarvestConfig::default();
        let mapped = map_study(&document, &profile(), &config).unwrap();
        let record = &mapped.record;

        assert_eq!(mapped.primary_identifier, "ABN-2023");
        assert_eq!(record.title["en"], "Antibiotic use");
        assert_eq!(record.description["en"], "Survey of antibiotic use");
        assert_eq!(record.issued.as_deref(), Some("2024-02-01T09:30:00"));
        assert_eq!(record.keywords.len(), 1);
        assert_eq!(record.access_rights.code, "RESTRICTED");
        assert_eq!(record.confidentiality_person, Some(Code::new("person")));
        assert_eq!(record.distributions[0].coverage, record.temporal_coverage);
        assert_eq!(record.contact_points[0].name["en"], "Study team");
        assert_eq!(record.contact_points[0].name["de"], "");
        assert_eq!(
            record.qualified_relations[0].relation.uri,
            "https://studies.example.org/catalog"
        );
        assert_eq!(record.spatial, vec!["Switzerland"]);
    }

    #[test]
    fn test_missing_idno_is_an_error() {
        let document: StudyDocument = serde_json::from_str(r#"{"dataset": {}}"#).unwrap();
        let result = map_study(&document, &profile(), &HarvestConfig::default());
        assert!(matches!(result, Err(HarvestError::Source(_))));
    }

    #[test]
    fn test_document_without_persons() {
        let document: StudyDocument = serde_json::from_str(
            r#"{"dataset": {"metadata": {"study_desc": {"title_statement": {"idno": "X"}}}}}"#,
        )
        .unwrap();
        let mapped = map_study(&document, &profile(), &HarvestConfig::default()).unwrap();
        assert_eq!(
            mapped.record.confidentiality_person,
            Some(Code::new("no_person"))
        );
        let doc = mapped.to_document().unwrap();
        assert!(doc["data"].get("title").is_none());
    }
}
