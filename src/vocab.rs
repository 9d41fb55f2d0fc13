//! Controlled vocabulary tables.
//!
//! Static lookups from external vocabulary URIs (IANA media types, EU
//! authority tables, DCAT-AP themes) to the codes expected by the target
//! catalogue schema. The tables are plain data; [`VocabularyTables`] wraps
//! them so a caller can swap in a different set through
//! [`crate::HarvestConfig`].

use std::collections::BTreeSet;

use indexmap::IndexMap;

const IANA: &str = "https://www.iana.org/assignments/media-types/";

/// Media types known to the target catalogue, relative to the IANA registry
/// URI, with their format codes.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("application/geo+json", "GEOJSON"),
    ("application/gzip", "GZIP"),
    ("application/json", "JSON"),
    ("application/ld+json", "JSON_LD"),
    ("application/pdf", "PDF"),
    ("application/rdf+xml", "RDF_XML"),
    ("application/sparql-query", "SPARQLQ"),
    ("application/sql", "SQL"),
    ("application/vnd.gentoo.gpkg", "GPKG"),
    ("application/vnd.rar", "RAR"),
    ("application/vnd.shp", "SHP"),
    ("application/xml", "XML"),
    ("application/yaml", "YAML"),
    ("application/zip", "ZIP"),
    ("text/csv", "CSV"),
    ("text/html", "HTML"),
    ("text/n3", "N3"),
    ("text/vnd.gml", "GML"),
    ("text/xml", "XML"),
];

const VALID_FORMAT_CODES: &[&str] = &[
    "CSV", "DXF", "EPUB", "GDB", "GEOJSON", "GEOTIFF", "GIF", "GML", "GPKG", "GPX", "HTML",
    "INTERLIS", "JPEG", "JSON", "JSON_LD", "KML", "MP3", "N3", "ODS", "PDF", "PNG", "RDF",
    "RDF_TURTLE", "RDF_XML", "RSS", "SCHEMA_XML", "SDMX", "SHP", "SKOS_XML", "SPARQLQ", "SQL",
    "SVG", "TIFF", "TSV", "TXT", "WFS_SRVC", "WMS_SRVC", "WMTS_SRVC", "XLS", "XLSX", "XML",
    "YAML",
];

const VALID_LICENSE_CODES: &[&str] = &["terms_open", "terms_by", "terms_by_ask", "terms_ask"];

const AVAILABILITY: &[(&str, &[&str])] = &[
    (
        "AVAILABLE",
        &[
            "http://publications.europa.eu/resource/authority/planned-availability/AVAILABLE",
            "http://data.europa.eu/r5r/availability/available",
        ],
    ),
    (
        "EXPERIMENTAL",
        &[
            "http://publications.europa.eu/resource/authority/planned-availability/EXPERIMENTAL",
            "http://data.europa.eu/r5r/availability/experimental",
        ],
    ),
    (
        "STABLE",
        &[
            "http://publications.europa.eu/resource/authority/planned-availability/STABLE",
            "http://data.europa.eu/r5r/availability/stable",
        ],
    ),
    (
        "TEMPORARY",
        &[
            "http://publications.europa.eu/resource/authority/planned-availability/TEMPORARY",
            "http://data.europa.eu/r5r/availability/temporary",
        ],
    ),
];

const LANGUAGES: &[(&str, &[&str])] = &[
    (
        "de",
        &[
            "de",
            "DE",
            "http://publications.europa.eu/resource/authority/language/DEU",
            "http://id.loc.gov/vocabulary/iso639-1/de",
        ],
    ),
    (
        "fr",
        &[
            "fr",
            "FR",
            "http://publications.europa.eu/resource/authority/language/FRA",
            "http://id.loc.gov/vocabulary/iso639-1/fr",
        ],
    ),
    (
        "it",
        &[
            "it",
            "IT",
            "http://publications.europa.eu/resource/authority/language/ITA",
            "http://id.loc.gov/vocabulary/iso639-1/it",
        ],
    ),
    (
        "en",
        &[
            "en",
            "EN",
            "http://publications.europa.eu/resource/authority/language/ENG",
            "http://id.loc.gov/vocabulary/iso639-1/en",
        ],
    ),
];

const EU_THEME: &str = "http://publications.europa.eu/resource/authority/data-theme/";

/// Target theme code, EU data-theme, and accepted `skos:prefLabel` spellings.
const THEMES: &[(&str, Option<&str>, &[&str])] = &[
    (
        "103",
        Some("EDUC"),
        &["Bildung, Kultur und Sport", "Education, culture and sport"],
    ),
    (
        "106",
        Some("SOCI"),
        &["Bevölkerung und Gesellschaft", "Population and society"],
    ),
    ("108", None, &["Bildung, Kultur und Sport"]),
    ("113", Some("ENVI"), &["Umwelt", "Environment", "Environnement"]),
    ("114", Some("HEAL"), &["Gesundheit", "Health", "Santé"]),
    (
        "115",
        Some("ECON"),
        &["Wirtschaft und Finanzen", "Economy and finance"],
    ),
    ("116", Some("TRAN"), &["Verkehr", "Transport", "Mobilität"]),
    ("117", None, &["Bevölkerung und Gesellschaft"]),
    (
        "119",
        Some("GOVE"),
        &["Regierung und öffentlicher Sektor", "Government and public sector"],
    ),
    ("120", Some("REGI"), &["Regionen und Städte", "Regions and cities"]),
    ("122", None, &["Regionen und Städte"]),
    ("124", Some("ENER"), &["Energie", "Energy", "Énergie"]),
];

/// One entry of the theme table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    /// Target theme code.
    pub code: String,
    /// Theme concept URIs mapped to this code.
    pub uris: Vec<String>,
    /// Label spellings mapped to this code (compared case-insensitively).
    pub labels: Vec<String>,
}

/// The full set of vocabulary lookups used by the extractors.
#[derive(Debug, Clone)]
pub struct VocabularyTables {
    /// Media type URI → media type code.
    pub media_types: IndexMap<String, String>,
    /// Format URI → format code.
    pub formats: IndexMap<String, String>,
    /// Format codes the target schema accepts.
    pub valid_format_codes: BTreeSet<String>,
    /// License codes the target schema accepts.
    pub valid_license_codes: BTreeSet<String>,
    /// Availability code → accepted URIs.
    pub availability: IndexMap<String, Vec<String>>,
    /// Language code → accepted URIs and spellings.
    pub languages: IndexMap<String, Vec<String>>,
    /// Theme table in lookup order.
    pub themes: Vec<ThemeEntry>,
}

impl Default for VocabularyTables {
    fn default() -> Self {
        let media_types = MEDIA_TYPES
            .iter()
            .map(|(media, _)| (format!("{IANA}{media}"), (*media).to_string()))
            .collect();
        let formats = MEDIA_TYPES
            .iter()
            .map(|(media, code)| (format!("{IANA}{media}"), (*code).to_string()))
            .collect();

        Self {
            media_types,
            formats,
            valid_format_codes: to_set(VALID_FORMAT_CODES),
            valid_license_codes: to_set(VALID_LICENSE_CODES),
            availability: to_alias_table(AVAILABILITY),
            languages: to_alias_table(LANGUAGES),
            themes: THEMES
                .iter()
                .map(|(code, eu, labels)| ThemeEntry {
                    code: (*code).to_string(),
                    uris: eu.iter().map(|t| format!("{EU_THEME}{t}")).collect(),
                    labels: labels.iter().map(|l| (*l).to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl VocabularyTables {
    /// Maps a media type URI to its code.
    ///
    /// A value that already is a known code (e.g. `text/csv`) is returned
    /// unchanged.
    #[must_use]
    pub fn media_type_code(&self, value: &str) -> Option<String> {
        if self.media_types.values().any(|code| code == value) {
            return Some(value.to_string());
        }
        self.media_types.get(value).cloned()
    }

    /// Maps a format URI to a format code accepted by the target schema.
    ///
    /// Unknown URIs fall back to their uppercased last path segment. Codes
    /// outside the allow-list yield `None`.
    #[must_use]
    pub fn format_code(&self, uri: &str) -> Option<String> {
        let code = self
            .formats
            .get(uri)
            .cloned()
            .unwrap_or_else(|| last_segment(uri).to_uppercase());
        self.valid_format_codes.contains(&code).then_some(code)
    }

    /// Accepts a license value when it, or its last path segment, is an
    /// allowed license code.
    #[must_use]
    pub fn license_code(&self, value: &str) -> Option<String> {
        [value, last_segment(value)]
            .into_iter()
            .find(|candidate| self.valid_license_codes.contains(*candidate))
            .map(String::from)
    }

    /// Maps an availability URI to its code.
    #[must_use]
    pub fn availability_code(&self, uri: &str) -> Option<String> {
        lookup_alias(&self.availability, uri)
    }

    /// Maps a language URI or spelling to its code.
    #[must_use]
    pub fn language_code(&self, value: &str) -> Option<String> {
        lookup_alias(&self.languages, value)
    }

    /// Returns the theme code assigned to a theme concept URI.
    #[must_use]
    pub fn theme_code_for_uri(&self, uri: &str) -> Option<&str> {
        self.themes
            .iter()
            .find(|theme| theme.uris.iter().any(|u| u == uri))
            .map(|theme| theme.code.as_str())
    }

    /// Returns every theme code whose label list contains `label`.
    pub fn theme_codes_for_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> {
        let label = label.trim();
        self.themes
            .iter()
            .filter(move |theme| theme.labels.iter().any(|l| l.eq_ignore_ascii_case(label)))
            .map(|theme| theme.code.as_str())
    }
}

/// Returns the last non-empty path segment of a URI.
#[must_use]
pub fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/')
        .rsplit(['/', '#'])
        .next()
        .unwrap_or(uri)
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn to_alias_table(table: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    table
        .iter()
        .map(|(code, aliases)| {
            (
                (*code).to_string(),
                aliases.iter().map(|a| (*a).to_string()).collect(),
            )
        })
        .collect()
}

fn lookup_alias(table: &IndexMap<String, Vec<String>>, value: &str) -> Option<String> {
    table
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| alias == value))
        .map(|(code, _)| code.clone())
}
