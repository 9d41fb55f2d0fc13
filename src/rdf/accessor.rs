//! Traversal helpers over a parsed DCAT graph.
//!
//! [`GraphAccessor`] answers the questions the extractors ask of a node:
//! a single literal, a single normalized URI, a list of linked resources, or
//! a per-language map of literals restricted to the supported languages.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::config::HarvestConfig;
use crate::dates::normalize_date;
use crate::mapping::record::{Code, DateRange, LangMap, LinkedResource};

use super::graph::{RdfGraph, RdfNode};
use super::namespaces::{dcat, dcterms, rdfs};

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").expect("valid HTML tag pattern");
}

/// Read-only view over a graph plus the configuration that governs
/// language filtering and vocabulary lookups.
#[derive(Debug, Clone, Copy)]
pub struct GraphAccessor<'a> {
    graph: &'a RdfGraph,
    config: &'a HarvestConfig,
}

impl<'a> GraphAccessor<'a> {
    /// Creates an accessor over `graph`.
    #[must_use]
    pub const fn new(graph: &'a RdfGraph, config: &'a HarvestConfig) -> Self {
        Self { graph, config }
    }

    /// The underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &'a RdfGraph {
        self.graph
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &'a HarvestConfig {
        self.config
    }

    /// Every object of `(subject, predicate, ?)`.
    pub fn objects(&self, subject: &RdfNode, predicate: &'a str) -> impl Iterator<Item = &'a RdfNode> + 'a {
        self.graph.objects(subject, predicate)
    }

    /// The lexical value of the first object, whatever its kind or language.
    #[must_use]
    pub fn literal(&self, subject: &RdfNode, predicate: &str) -> Option<String> {
        self.graph
            .value(subject, predicate)
            .map(|node| node.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Like [`Self::literal`], normalized to an ISO date string.
    #[must_use]
    pub fn date(&self, subject: &RdfNode, predicate: &str) -> Option<String> {
        self.literal(subject, predicate)
            .map(|value| normalize_date(&value))
    }

    /// The first object as a normalized URI.
    #[must_use]
    pub fn resource(&self, subject: &RdfNode, predicate: &str) -> Option<String> {
        self.graph
            .value(subject, predicate)
            .map(|node| normalize_uri(node.as_str()))
            .filter(|uri| !uri.is_empty())
    }

    /// Every object as a `{uri, label}` pair, labels taken from `rdfs:label`.
    #[must_use]
    pub fn resources(&self, subject: &RdfNode, predicate: &str) -> Vec<LinkedResource> {
        self.graph
            .objects(subject, predicate)
            .map(|node| LinkedResource {
                uri: normalize_uri(node.as_str()),
                label: self.multilingual(node, rdfs::LABEL),
            })
            .filter(|resource| !resource.uri.is_empty())
            .collect()
    }

    /// Per-language map of the literal objects of `(subject, predicate)`.
    ///
    /// Only literals tagged with a supported language are kept; HTML markup
    /// is stripped, and languages left without text are absent from the map.
    /// When a language occurs more than once the last literal wins.
    #[must_use]
    pub fn multilingual(&self, subject: &RdfNode, predicate: &str) -> LangMap {
        let mut values = LangMap::new();
        for node in self.graph.objects(subject, predicate) {
            let Some(language) = node.language() else {
                continue;
            };
            let Some(code) = self
                .config
                .supported_languages
                .iter()
                .find(|lang| lang.eq_ignore_ascii_case(language))
            else {
                continue;
            };
            values.insert(code.clone(), strip_html(node.as_str()));
        }
        values.retain(|_, value| !value.is_empty());

        // Keep the configured language order regardless of document order
        let order = &self.config.supported_languages;
        values.sort_by(|a, _, b, _| {
            let pos = |k: &str| order.iter().position(|l| l == k);
            pos(a.as_str()).cmp(&pos(b.as_str()))
        });
        values
    }

    /// Language-tagged keywords, one single-entry map per literal.
    ///
    /// Keywords keep their own language tag even when it is not a supported
    /// language; untagged keywords are dropped.
    #[must_use]
    pub fn keywords(&self, subject: &RdfNode, predicate: &str) -> Vec<LangMap> {
        self.graph
            .objects(subject, predicate)
            .filter_map(|node| {
                let language = node.language()?;
                let keyword = node.as_str().trim();
                (!keyword.is_empty())
                    .then(|| LangMap::from([(language.to_string(), keyword.to_string())]))
            })
            .collect()
    }

    /// `dcterms:PeriodOfTime` objects of `(subject, predicate)` as date ranges.
    ///
    /// Start and end are read from `dcat:startDate`/`dcat:endDate`, falling
    /// back to `dcterms:start`/`dcterms:end`. Literal objects and periods
    /// without either bound are skipped.
    #[must_use]
    pub fn periods(&self, subject: &RdfNode, predicate: &str) -> Vec<DateRange> {
        self.graph
            .objects(subject, predicate)
            .filter(|node| !node.is_literal() && self.graph.has_type(node, dcterms::PERIOD_OF_TIME))
            .map(|node| DateRange {
                start: self
                    .date(node, dcat::START_DATE)
                    .or_else(|| self.date(node, dcterms::START)),
                end: self
                    .date(node, dcat::END_DATE)
                    .or_else(|| self.date(node, dcterms::END)),
            })
            .filter(|range| range.start.is_some() || range.end.is_some())
            .collect()
    }

    /// Language codes of the objects of `(subject, predicate)`, deduplicated
    /// in first-seen order.
    #[must_use]
    pub fn languages(&self, subject: &RdfNode, predicate: &str) -> Vec<Code> {
        let mut codes: Vec<Code> = Vec::new();
        for code in self
            .graph
            .objects(subject, predicate)
            .filter_map(|node| self.config.vocabulary.language_code(node.as_str()))
        {
            if !codes.iter().any(|known| known.code == code) {
                codes.push(Code::new(code));
            }
        }
        codes
    }
}

/// Removes HTML tags and surrounding whitespace from a literal.
#[must_use]
pub fn strip_html(value: &str) -> String {
    HTML_TAG.replace_all(value, "").trim().to_string()
}

/// Normalizes a URI for comparison and output.
///
/// Trims whitespace, drops `utm_*` tracking parameters, and removes a
/// dangling `?` or `#`. Applying it twice yields the same result.
#[must_use]
pub fn normalize_uri(value: &str) -> String {
    let value = value.trim();

    let (rest, fragment) = match value.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (value, None),
    };
    let (base, query) = match rest.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (rest, None),
    };

    let mut normalized = base.trim_end().to_string();
    if let Some(query) = query {
        let kept: Vec<&str> = query
            .split('&')
            .map(str::trim)
            .filter(|pair| !pair.is_empty() && !pair.starts_with("utm_"))
            .collect();
        if !kept.is_empty() {
            normalized.push('?');
            normalized.push_str(&kept.join("&"));
        }
    }
    if let Some(fragment) = fragment.map(str::trim).filter(|f| !f.is_empty()) {
        normalized.push('#');
        normalized.push_str(fragment);
    }
    normalized
}

/// Returns true if `value` parses as an absolute URI with a scheme.
#[must_use]
pub fn is_valid_uri(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| !url.cannot_be_a_base() || url.scheme() == "mailto")
}
