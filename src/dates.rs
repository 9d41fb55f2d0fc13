//! Date handling for source literals and catalogue timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a date literal to an ISO 8601 string.
///
/// Plain dates stay `YYYY-MM-DD`. Date-times become `YYYY-MM-DDTHH:MM:SS`,
/// converted to UTC when an offset is present. Anything unparseable is
/// returned trimmed but otherwise unchanged.
#[must_use]
pub fn normalize_date(value: &str) -> String {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return format_naive(&datetime.with_timezone(&Utc).naive_utc());
    }
    if let Some(naive) = parse_naive(value) {
        return format_naive(&naive);
    }

    value.to_string()
}

/// Parses a source catalogue timestamp.
///
/// Timestamps without an offset are interpreted in `local_offset`, matching
/// catalogues that report wall-clock time.
#[must_use]
pub fn parse_timestamp(value: &str, local_offset: FixedOffset) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    let naive = parse_naive(value).or_else(|| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })?;

    local_offset
        .from_local_datetime(&naive)
        .single()
        .map(|datetime| datetime.with_timezone(&Utc))
}

/// Central European Time without daylight saving (UTC+1).
#[must_use]
pub fn cet() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap_or_else(|| Utc.fix())
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn format_naive(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}
