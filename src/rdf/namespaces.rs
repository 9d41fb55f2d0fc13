//! Vocabulary terms referenced by the extractors.
//!
//! Each submodule holds the namespace URI of one vocabulary plus the full URIs
//! of the terms the harvester reads. Full URIs (rather than prefix + local
//! name) keep graph lookups allocation-free.

/// RDF namespace.
pub mod rdf {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDF Schema namespace.
pub mod rdfs {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// `rdfs:label`
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XML Schema namespace.
pub mod xsd {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    /// `xsd:string`, the implicit datatype of plain literals.
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// Data Catalog Vocabulary (DCAT 2/3).
pub mod dcat {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/ns/dcat#";
    /// `dcat:Dataset` class.
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    /// `dcat:distribution`
    pub const DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#distribution";
    /// `dcat:accessURL`
    pub const ACCESS_URL: &str = "http://www.w3.org/ns/dcat#accessURL";
    /// `dcat:downloadURL`
    pub const DOWNLOAD_URL: &str = "http://www.w3.org/ns/dcat#downloadURL";
    /// `dcat:accessService`
    pub const ACCESS_SERVICE: &str = "http://www.w3.org/ns/dcat#accessService";
    /// `dcat:mediaType`
    pub const MEDIA_TYPE: &str = "http://www.w3.org/ns/dcat#mediaType";
    /// `dcat:byteSize`
    pub const BYTE_SIZE: &str = "http://www.w3.org/ns/dcat#byteSize";
    /// `dcat:packageFormat`
    pub const PACKAGE_FORMAT: &str = "http://www.w3.org/ns/dcat#packageFormat";
    /// `dcat:spatialResolutionInMeters`
    pub const SPATIAL_RESOLUTION: &str = "http://www.w3.org/ns/dcat#spatialResolutionInMeters";
    /// `dcat:temporalResolution`
    pub const TEMPORAL_RESOLUTION: &str = "http://www.w3.org/ns/dcat#temporalResolution";
    /// `dcat:landingPage`
    pub const LANDING_PAGE: &str = "http://www.w3.org/ns/dcat#landingPage";
    /// `dcat:keyword`
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    /// `dcat:theme`
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    /// `dcat:contactPoint`
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
    /// `dcat:startDate`
    pub const START_DATE: &str = "http://www.w3.org/ns/dcat#startDate";
    /// `dcat:endDate`
    pub const END_DATE: &str = "http://www.w3.org/ns/dcat#endDate";
    /// `dcat:version`
    pub const VERSION: &str = "http://www.w3.org/ns/dcat#version";
}

/// Dublin Core Terms.
pub mod dcterms {
    /// Namespace URI.
    pub const NS: &str = "http://purl.org/dc/terms/";
    /// `dcterms:identifier`
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    /// `dcterms:title`
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    /// `dcterms:description`
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    /// `dcterms:issued`
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    /// `dcterms:modified`
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    /// `dcterms:language`
    pub const LANGUAGE: &str = "http://purl.org/dc/terms/language";
    /// `dcterms:format`
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    /// `dcterms:license`
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    /// `dcterms:rights`
    pub const RIGHTS: &str = "http://purl.org/dc/terms/rights";
    /// `dcterms:conformsTo`
    pub const CONFORMS_TO: &str = "http://purl.org/dc/terms/conformsTo";
    /// `dcterms:coverage`
    pub const COVERAGE: &str = "http://purl.org/dc/terms/coverage";
    /// `dcterms:temporal`
    pub const TEMPORAL: &str = "http://purl.org/dc/terms/temporal";
    /// `dcterms:spatial`
    pub const SPATIAL: &str = "http://purl.org/dc/terms/spatial";
    /// `dcterms:start`
    pub const START: &str = "http://purl.org/dc/terms/start";
    /// `dcterms:end`
    pub const END: &str = "http://purl.org/dc/terms/end";
    /// `dcterms:accrualPeriodicity`
    pub const ACCRUAL_PERIODICITY: &str = "http://purl.org/dc/terms/accrualPeriodicity";
    /// `dcterms:isReferencedBy`
    pub const IS_REFERENCED_BY: &str = "http://purl.org/dc/terms/isReferencedBy";
    /// `dcterms:relation`
    pub const RELATION: &str = "http://purl.org/dc/terms/relation";
    /// `dcterms:PeriodOfTime` class.
    pub const PERIOD_OF_TIME: &str = "http://purl.org/dc/terms/PeriodOfTime";
}

/// Friend of a Friend.
pub mod foaf {
    /// Namespace URI.
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";
    /// `foaf:page`
    pub const PAGE: &str = "http://xmlns.com/foaf/0.1/page";
}

/// schema.org.
pub mod schema {
    /// Namespace URI.
    pub const NS: &str = "http://schema.org/";
    /// `schema:image`
    pub const IMAGE: &str = "http://schema.org/image";
}

/// SKOS.
pub mod skos {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// `skos:prefLabel`
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

/// vCard.
pub mod vcard {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/2006/vcard/ns#";
    /// `vcard:fn`
    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    /// `vcard:hasEmail`
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
    /// `vcard:hasAddress`
    pub const HAS_ADDRESS: &str = "http://www.w3.org/2006/vcard/ns#hasAddress";
    /// `vcard:hasTelephone`
    pub const HAS_TELEPHONE: &str = "http://www.w3.org/2006/vcard/ns#hasTelephone";
    /// `vcard:hasValue`
    pub const HAS_VALUE: &str = "http://www.w3.org/2006/vcard/ns#hasValue";
    /// `vcard:note`
    pub const NOTE: &str = "http://www.w3.org/2006/vcard/ns#note";
}

/// Asset Description Metadata Schema.
pub mod adms {
    /// Namespace URI.
    pub const NS: &str = "http://www.w3.org/ns/adms#";
    /// `adms:versionNotes`
    pub const VERSION_NOTES: &str = "http://www.w3.org/ns/adms#versionNotes";
}

/// SPDX.
pub mod spdx {
    /// Namespace URI.
    pub const NS: &str = "http://spdx.org/rdf/terms#";
    /// `spdx:checksum`
    pub const CHECKSUM: &str = "http://spdx.org/rdf/terms#checksum";
    /// `spdx:algorithm`
    pub const ALGORITHM: &str = "http://spdx.org/rdf/terms#algorithm";
    /// `spdx:checksumAlgorithm`
    pub const CHECKSUM_ALGORITHM: &str = "http://spdx.org/rdf/terms#checksumAlgorithm";
    /// `spdx:checksumValue`
    pub const CHECKSUM_VALUE: &str = "http://spdx.org/rdf/terms#checksumValue";
}

/// DCAT-AP availability extension.
pub mod r5r {
    /// `dcatap:availability`
    pub const AVAILABILITY: &str = "http://data.europa.eu/r5r/availability";
}
