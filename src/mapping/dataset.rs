//! Dataset extraction.
//!
//! Builds a [`DatasetRecord`] from a `dcat:Dataset` node. The validity gate
//! runs first: a dataset without a valid distribution, or without a
//! description in any supported language, is rejected before the remaining
//! fields are read.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::HarvestConfig;
use crate::rdf::namespaces::{adms, dcat, dcterms, foaf, rdfs, schema, skos, vcard};
use crate::rdf::{is_valid_uri, normalize_uri, GraphAccessor, RdfNode};
use crate::vocab::last_segment;

use super::distribution::extract_distribution;
use super::record::{
    Code, ContactPoint, DatasetRecord, LangMap, LinkedResource, MappedDataset, QualifiedRelation,
};
use super::{Extraction, MappingOutcome, MappingWarning, Rejection};

lazy_static! {
    static ref RELATION_SEPARATOR: Regex = Regex::new(r";\s+").expect("valid separator pattern");
}

/// Marker that identifies catalogue-style identifiers worth rewriting.
const DATASET_MARKER: &str = "/dataset/";

/// Extracts one dataset node.
#[must_use]
pub fn extract_dataset(acc: &GraphAccessor<'_>, node: &RdfNode) -> Extraction {
    let config = acc.config();
    let mut warnings = Vec::new();

    let distributions: Vec<_> = acc
        .objects(node, dcat::DISTRIBUTION)
        .map(|dist| extract_distribution(acc, dist))
        .filter(|dist| dist.is_valid(config))
        .collect();
    if distributions.is_empty() {
        log::debug!("Rejecting {}: no valid distributions", node.as_str());
        return Extraction::rejected(Rejection::NoValidDistributions);
    }

    let description = acc.multilingual(node, dcterms::DESCRIPTION);
    if description.is_empty() {
        log::debug!("Rejecting {}: empty description", node.as_str());
        return Extraction::rejected(Rejection::EmptyDescription);
    }

    let source_identifier = acc.literal(node, dcterms::IDENTIFIER);
    let identifiers = rewrite_identifier(
        &config.organization_id,
        source_identifier.as_deref().unwrap_or(node.as_str()),
    );

    let relations = relations(acc, node, &identifiers[0], &mut warnings);

    let record = DatasetRecord {
        title: acc.multilingual(node, dcterms::TITLE),
        description,
        access_rights: Code::new(config.access_rights.as_str()),
        issued: acc.date(node, dcterms::ISSUED),
        modified: acc.date(node, dcterms::MODIFIED),
        publisher: config.default_publisher.clone(),
        landing_pages: acc.resources(node, dcat::LANDING_PAGE),
        keywords: acc.keywords(node, dcat::KEYWORD),
        distributions,
        languages: acc.languages(node, dcterms::LANGUAGE),
        contact_points: contact_points(acc, node),
        documentation: acc.resources(node, foaf::PAGE),
        images: acc.resources(node, schema::IMAGE),
        temporal_coverage: acc.periods(node, dcterms::TEMPORAL),
        frequency: acc
            .resource(node, dcterms::ACCRUAL_PERIODICITY)
            .map(|uri| Code::new(last_segment(&uri))),
        is_referenced_by: acc.resources(node, dcterms::IS_REFERENCED_BY),
        relations,
        spatial: acc
            .objects(node, dcterms::SPATIAL)
            .filter(|spatial| !matches!(spatial, RdfNode::BlankNode(_)))
            .map(|spatial| spatial.as_str().trim().to_string())
            .collect(),
        version: acc.literal(node, dcat::VERSION),
        version_notes: acc.multilingual(node, adms::VERSION_NOTES),
        conforms_to: acc.resources(node, dcterms::CONFORMS_TO),
        themes: themes(acc, node),
        qualified_relations: source_identifier
            .map(|identifier| QualifiedRelation {
                had_role: Code::new("original"),
                relation: LinkedResource::new(identifier),
            })
            .into_iter()
            .collect(),
        identifiers,
        ..DatasetRecord::default()
    };

    log::debug!("Mapped dataset {}", record.identifiers[0]);
    Extraction {
        outcome: MappingOutcome::Mapped(Box::new(MappedDataset::new(record))),
        warnings,
    }
}

/// Rewrites `.../dataset/{N}` to `{org}_dataset_{N}`, keeping the original
/// as the second identifier. Other identifiers are returned unchanged.
#[must_use]
pub fn rewrite_identifier(organization_id: &str, identifier: &str) -> Vec<String> {
    let number = identifier
        .rfind(DATASET_MARKER)
        .map(|pos| identifier[pos + DATASET_MARKER.len()..].trim_end_matches('/'))
        .filter(|number| !number.is_empty());

    match number {
        Some(number) => vec![
            format!("{organization_id}_dataset_{number}"),
            identifier.to_string(),
        ],
        None => vec![identifier.to_string()],
    }
}

/// Splits relation literals on `;` and keeps the segments that are URIs.
fn relations(
    acc: &GraphAccessor<'_>,
    node: &RdfNode,
    dataset: &str,
    warnings: &mut Vec<MappingWarning>,
) -> Vec<LinkedResource> {
    let mut relations = Vec::new();
    for object in acc.objects(node, dcterms::RELATION) {
        let text = object
            .as_str()
            .trim_matches(|c: char| matches!(c, ';' | ' ' | '\t' | '\n' | '\r'));
        for segment in RELATION_SEPARATOR.split(text).map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            if is_valid_uri(segment) {
                relations.push(LinkedResource {
                    uri: normalize_uri(segment),
                    label: acc.multilingual(object, rdfs::LABEL),
                });
            } else {
                log::warn!("Skipping invalid relation URI in {dataset}: {segment}");
                warnings.push(MappingWarning::InvalidRelationUri {
                    dataset: dataset.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
    }
    relations
}

/// Theme codes, deduplicated in first-seen order.
///
/// Literal themes are taken as codes. Theme concepts are looked up by URI,
/// then by each of their `skos:prefLabel` values.
fn themes(acc: &GraphAccessor<'_>, node: &RdfNode) -> Vec<Code> {
    let vocab = &acc.config().vocabulary;
    let mut themes: Vec<Code> = Vec::new();
    let mut push = |code: &str| {
        if !themes.iter().any(|theme| theme.code == code) {
            themes.push(Code::new(code));
        }
    };

    for theme in acc.objects(node, dcat::THEME) {
        if theme.is_literal() {
            push(theme.as_str().trim());
            continue;
        }
        if let Some(code) = vocab.theme_code_for_uri(theme.as_str()) {
            push(code);
            continue;
        }
        for label in acc.objects(theme, skos::PREF_LABEL) {
            vocab.theme_codes_for_label(label.as_str()).for_each(&mut push);
        }
    }
    themes
}

fn contact_points(acc: &GraphAccessor<'_>, node: &RdfNode) -> Vec<ContactPoint> {
    let config = acc.config();
    acc.objects(node, dcat::CONTACT_POINT)
        .filter_map(|contact| {
            let mut name = acc.multilingual(contact, vcard::FN);
            if name.is_empty() {
                // Untagged names are filed under the contact language
                if let Some(plain) = acc
                    .objects(contact, vcard::FN)
                    .find(|n| n.is_literal() && n.language().is_none())
                {
                    let plain = plain.as_str().trim();
                    if !plain.is_empty() {
                        name.insert(config.contact_language.clone(), plain.to_string());
                    }
                }
            }
            let email = vcard_value(acc, contact, vcard::HAS_EMAIL)
                .map(|email| email.trim_start_matches("mailto:").to_string());
            let telephone = vcard_value(acc, contact, vcard::HAS_TELEPHONE)
                .map(|phone| phone.trim_start_matches("tel:").to_string());
            let address = acc.multilingual(contact, vcard::HAS_ADDRESS);
            let note = acc.multilingual(contact, vcard::NOTE);

            let has_content = !name.is_empty()
                || email.as_deref().is_some_and(|e| !e.is_empty())
                || telephone.as_deref().is_some_and(|t| !t.is_empty())
                || !address.is_empty()
                || !note.is_empty();
            if !has_content {
                return None;
            }

            Some(ContactPoint {
                name: all_languages(config, name),
                has_address: all_languages(config, address),
                has_email: email,
                has_telephone: telephone,
                note: all_languages(config, note),
                ..ContactPoint::empty(config)
            })
        })
        .collect()
}

/// Reads a vCard property given either directly or through `vcard:hasValue`.
fn vcard_value(acc: &GraphAccessor<'_>, contact: &RdfNode, predicate: &str) -> Option<String> {
    let value = acc.graph().value(contact, predicate)?;
    let text = match value {
        RdfNode::BlankNode(_) => acc.literal(value, vcard::HAS_VALUE)?,
        _ => value.as_str().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Fills in every supported language, keeping the given values.
fn all_languages(config: &HarvestConfig, values: LangMap) -> LangMap {
    let mut full = config.all_languages("");
    for (lang, value) in values {
        full.insert(lang, value);
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RdfFormat;
    use crate::rdf::RdfGraph;

    const PREFIXES: &str = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        @prefix vcard: <http://www.w3.org/2006/vcard/ns#> .
    "#;

    fn extract(body: &str) -> Extraction {
        let graph = RdfGraph::parse(&format!("{PREFIXES}{body}"), RdfFormat::Turtle).expect("parse");
        let config = HarvestConfig::default();
        let acc = GraphAccessor::new(&graph, &config);
        let node = graph.dataset_nodes()[0].clone();
        extract_dataset(&acc, &node)
    }

    fn mapped(extraction: Extraction) -> MappedDataset {
        match extraction.outcome {
            MappingOutcome::Mapped(mapped) => *mapped,
            MappingOutcome::Rejected(reason) => panic!("unexpected rejection: {reason}"),
        }
    }

    #[test]
    fn test_rewrite_identifier() {
        assert_eq!(
            rewrite_identifier("CH_KT_BL", "https://data.bl.ch/explore/dataset/12060/"),
            vec!["CH_KT_BL_dataset_12060", "https://data.bl.ch/explore/dataset/12060/"]
        );
        assert_eq!(rewrite_identifier("ORG", "12060@kanton-bl"), vec!["12060@kanton-bl"]);
        assert_eq!(rewrite_identifier("ORG", "http://x/dataset/"), vec!["http://x/dataset/"]);
    }

    #[test]
    fn test_rejects_without_description() {
        let extraction = extract(
            r#"<http://ex.org/ds> a dcat:Dataset ;
                dct:title "Titel"@de ;
                dct:description "Only in Romansh"@rm ;
                dcat:distribution [ dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ] ."#,
        );
        assert!(matches!(
            extraction.outcome,
            MappingOutcome::Rejected(Rejection::EmptyDescription)
        ));
    }

    #[test]
    fn test_rejection_order() {
        // Both conditions fail; distributions are checked first
        let extraction = extract(r#"<http://ex.org/ds> a dcat:Dataset ; dct:title "T"@de ."#);
        assert!(matches!(
            extraction.outcome,
            MappingOutcome::Rejected(Rejection::NoValidDistributions)
        ));
    }

    #[test]
    fn test_invalid_distributions_dropped() {
        let dataset = mapped(extract(
            r#"<http://ex.org/ds> a dcat:Dataset ;
                dct:identifier "https://data.bl.ch/explore/dataset/42/" ;
                dct:description "Beschreibung"@de ;
                dcat:distribution [ dcat:mediaType <https://www.iana.org/assignments/media-types/application/pdf> ],
                    [ dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ],
                    [ dct:title "no media type"@en ] ."#,
        ));
        assert_eq!(dataset.primary_identifier, "CH_KT_BL_dataset_42");
        assert_eq!(dataset.record.distributions.len(), 1);
        assert_eq!(
            dataset.record.qualified_relations[0].relation.uri,
            "https://data.bl.ch/explore/dataset/42/"
        );
    }

    #[test]
    fn test_themes_deduplicated() {
        let dataset = mapped(extract(
            r#"<http://ex.org/ds> a dcat:Dataset ;
                dct:description "Beschreibung"@de ;
                dcat:distribution [ dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ] ;
                dcat:theme <http://ex.org/theme/a>, <http://ex.org/theme/b>,
                    <http://publications.europa.eu/resource/authority/data-theme/ENER>, "119" .
            <http://ex.org/theme/a> skos:prefLabel "Gesundheit"@de .
            <http://ex.org/theme/b> skos:prefLabel "Health"@en ."#,
        ));
        assert_eq!(
            dataset.record.themes,
            vec![Code::new("114"), Code::new("124"), Code::new("119")]
        );
    }

    #[test]
    fn test_contact_points() {
        let dataset = mapped(extract(
            r#"<http://ex.org/ds> a dcat:Dataset ;
                dct:description "Beschreibung"@de ;
                dcat:distribution [ dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ] ;
                dcat:contactPoint [ vcard:fn "Statistisches Amt" ; vcard:hasEmail <mailto:stat@bl.ch> ],
                    [ vcard:hasTelephone [ vcard:hasValue <tel:+41615525656> ] ],
                    [ vcard:fn ""@de ] ."#,
        ));
        let contacts = &dataset.record.contact_points;
        assert_eq!(contacts.len(), 2);

        assert_eq!(contacts[0].name["de"], "Statistisches Amt");
        assert_eq!(contacts[0].name["fr"], "");
        assert_eq!(contacts[0].has_email.as_deref(), Some("stat@bl.ch"));
        assert_eq!(contacts[0].note.len(), 4);

        assert_eq!(contacts[1].has_telephone.as_deref(), Some("+41615525656"));
        assert!(contacts[1].name.values().all(String::is_empty));
    }

    #[test]
    fn test_relations_and_frequency() {
        let extraction = extract(
            r#"<http://ex.org/ds> a dcat:Dataset ;
                dct:description "Beschreibung"@de ;
                dcat:distribution [ dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ] ;
                dct:accrualPeriodicity <http://publications.europa.eu/resource/authority/frequency/MONTHLY> ;
                dct:relation "http://a.org; not-a-uri; http://b.org;" ."#,
        );
        assert_eq!(extraction.warnings.len(), 1);
        let dataset = mapped(extraction);
        let uris: Vec<&str> = dataset.record.relations.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["http://a.org", "http://b.org"]);
        assert_eq!(dataset.record.frequency, Some(Code::new("MONTHLY")));
        // No dct:identifier: the node URI stands in
        assert_eq!(dataset.record.identifiers, vec!["http://ex.org/ds"]);
        assert!(dataset.record.qualified_relations.is_empty());
    }
}
