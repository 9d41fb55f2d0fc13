//! Distribution extraction.

use crate::rdf::namespaces::{dcat, dcterms, foaf, r5r, rdfs, schema, spdx};
use crate::rdf::{normalize_uri, GraphAccessor, RdfNode};
use crate::vocab::last_segment;

use super::record::{Checksum, Code, Distribution, LinkedResource, ServiceRef};

/// Extracts one distribution node.
///
/// The result is always returned; a distribution without a recognised media
/// type comes back with `media_type: None` and fails
/// [`Distribution::is_valid`].
#[must_use]
pub fn extract_distribution(acc: &GraphAccessor<'_>, node: &RdfNode) -> Distribution {
    let config = acc.config();
    let vocab = &config.vocabulary;

    let mut title = acc.multilingual(node, dcterms::TITLE);
    if title.is_empty() {
        title = config.all_languages(&config.default_distribution_title);
    }
    let mut description = acc.multilingual(node, dcterms::DESCRIPTION);
    if description.is_empty() {
        description = config.all_languages(&config.default_distribution_description);
    }

    let format = acc
        .resource(node, dcterms::FORMAT)
        .and_then(|uri| vocab.format_code(&uri))
        .map(Code::new);
    let media_type = acc
        .resource(node, dcat::MEDIA_TYPE)
        .and_then(|uri| vocab.media_type_code(&uri))
        .map(Code::new);

    let (access_url, download_url) = urls(acc, node);

    Distribution {
        title,
        description,
        format,
        media_type,
        access_url,
        download_url,
        license: acc
            .resource(node, dcterms::LICENSE)
            .and_then(|value| vocab.license_code(&value))
            .map(Code::new),
        availability: acc
            .resource(node, r5r::AVAILABILITY)
            .and_then(|uri| vocab.availability_code(&uri))
            .map(Code::new),
        issued: acc.date(node, dcterms::ISSUED),
        modified: acc.date(node, dcterms::MODIFIED),
        rights: acc.literal(node, dcterms::RIGHTS),
        access_services: acc
            .objects(node, dcat::ACCESS_SERVICE)
            .map(|service| ServiceRef {
                id: normalize_uri(service.as_str()),
            })
            .collect(),
        byte_size: acc
            .literal(node, dcat::BYTE_SIZE)
            .and_then(|size| size.parse().ok()),
        checksum: checksum(acc, node),
        conforms_to: acc.resources(node, dcterms::CONFORMS_TO),
        coverage: acc.periods(node, dcterms::COVERAGE),
        documentation: acc.resources(node, foaf::PAGE),
        identifier: acc.literal(node, dcterms::IDENTIFIER),
        images: acc.resources(node, schema::IMAGE),
        languages: acc.languages(node, dcterms::LANGUAGE),
        packaging_format: acc.literal(node, dcat::PACKAGE_FORMAT).map(Code::new),
        spatial_resolution: acc.literal(node, dcat::SPATIAL_RESOLUTION),
        temporal_resolution: acc.literal(node, dcat::TEMPORAL_RESOLUTION),
    }
}

/// Access URL prefers `dcat:accessURL`; download URL prefers `dcat:downloadURL`.
/// Each falls back to the other, and both are absent when neither is given.
fn urls(
    acc: &GraphAccessor<'_>,
    node: &RdfNode,
) -> (Option<LinkedResource>, Option<LinkedResource>) {
    let access = acc.resource(node, dcat::ACCESS_URL);
    let download = acc.resource(node, dcat::DOWNLOAD_URL);
    let Some(common) = access.or_else(|| download.clone()) else {
        return (None, None);
    };

    let label = acc.multilingual(node, rdfs::LABEL);
    let download_url = LinkedResource {
        uri: download.unwrap_or_else(|| common.clone()),
        label: label.clone(),
    };
    let access_url = LinkedResource { uri: common, label };
    (Some(access_url), Some(download_url))
}

/// Reads the checksum either inline or from an `spdx:checksum` node.
fn checksum(acc: &GraphAccessor<'_>, node: &RdfNode) -> Option<Checksum> {
    let mut algorithm = acc.literal(node, spdx::CHECKSUM_ALGORITHM);
    let mut value = acc.literal(node, spdx::CHECKSUM_VALUE);

    if let Some(nested) = acc.graph().value(node, spdx::CHECKSUM) {
        algorithm = algorithm.or_else(|| acc.literal(nested, spdx::ALGORITHM));
        value = value.or_else(|| acc.literal(nested, spdx::CHECKSUM_VALUE));
    }

    if algorithm.is_none() && value.is_none() {
        return None;
    }
    Some(Checksum {
        algorithm: algorithm.map(|a| Code::new(last_segment(&a))),
        checksum_value: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HarvestConfig, RdfFormat};
    use crate::rdf::RdfGraph;

    const TURTLE: &str = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix spdx: <http://spdx.org/rdf/terms#> .
        @prefix r5r: <http://data.europa.eu/r5r/> .

        <http://example.org/dist/csv>
            dct:title "Messwerte"@de ;
            dct:format <http://publications.europa.eu/resource/authority/file-type/CSV> ;
            dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ;
            dcat:downloadURL <http://example.org/data.csv?utm_campaign=x> ;
            rdfs:label "CSV-Datei"@de ;
            dct:license <http://dcat-ap.ch/vocabulary/licenses/terms_by> ;
            r5r:availability <http://data.europa.eu/r5r/availability/stable> ;
            dcat:byteSize "2048" ;
            spdx:checksum [ spdx:algorithm spdx:checksumAlgorithm_sha1 ; spdx:checksumValue "abc123" ] ;
            dcat:accessService <http://example.org/api> .

        <http://example.org/dist/pdf>
            dct:format <http://publications.europa.eu/resource/authority/file-type/PDF> ;
            dcat:mediaType <https://www.iana.org/assignments/media-types/application/pdf> ;
            dcat:accessURL <http://example.org/report.pdf> ;
            dcat:downloadURL <http://example.org/report-download.pdf> ;
            dct:license "cc-by" ;
            dcat:byteSize "about 2MB" ;
            spdx:checksumValue "ff00" .

        <http://example.org/dist/bare> dct:title "Bare"@en .
    "#;

    fn extract(uri: &str) -> Distribution {
        let graph = RdfGraph::parse(TURTLE, RdfFormat::Turtle).expect("parse");
        let config = HarvestConfig::default();
        let acc = GraphAccessor::new(&graph, &config);
        extract_distribution(&acc, &RdfNode::uri(uri))
    }

    #[test]
    fn test_csv_distribution() {
        let dist = extract("http://example.org/dist/csv");
        let config = HarvestConfig::default();

        assert!(dist.is_valid(&config));
        assert_eq!(dist.format, Some(Code::new("CSV")));
        assert_eq!(dist.media_type, Some(Code::new("text/csv")));
        assert_eq!(dist.license, Some(Code::new("terms_by")));
        assert_eq!(dist.availability, Some(Code::new("STABLE")));
        assert_eq!(dist.byte_size, Some(2048));

        // Download URL is the only URL, so it serves both fields
        let access = dist.access_url.expect("access url");
        assert_eq!(access.uri, "http://example.org/data.csv");
        assert_eq!(access.label["de"], "CSV-Datei");
        assert_eq!(dist.download_url.expect("download url").uri, access.uri);

        let checksum = dist.checksum.expect("checksum");
        assert_eq!(checksum.algorithm, Some(Code::new("checksumAlgorithm_sha1")));
        assert_eq!(checksum.checksum_value.as_deref(), Some("abc123"));
        assert_eq!(dist.access_services[0].id, "http://example.org/api");
    }

    #[test]
    fn test_description_fallback() {
        let dist = extract("http://example.org/dist/csv");
        assert_eq!(dist.title.len(), 1);
        assert_eq!(dist.description.len(), 4);
        assert_eq!(dist.description["fr"], "Distribution");
    }

    #[test]
    fn test_pdf_distribution_is_invalid() {
        let dist = extract("http://example.org/dist/pdf");
        assert!(!dist.is_valid(&HarvestConfig::default()));

        assert_eq!(dist.access_url.unwrap().uri, "http://example.org/report.pdf");
        assert_eq!(
            dist.download_url.unwrap().uri,
            "http://example.org/report-download.pdf"
        );
        assert_eq!(dist.license, None);
        assert_eq!(dist.byte_size, None);

        let checksum = dist.checksum.expect("partial checksum");
        assert_eq!(checksum.algorithm, None);
        assert_eq!(checksum.checksum_value.as_deref(), Some("ff00"));
    }

    #[test]
    fn test_missing_media_type_and_urls() {
        let dist = extract("http://example.org/dist/bare");
        assert_eq!(dist.media_type, None);
        assert!(dist.access_url.is_none());
        assert!(dist.download_url.is_none());
        assert!(dist.checksum.is_none());
        assert!(!dist.is_valid(&HarvestConfig::default()));
    }
}
