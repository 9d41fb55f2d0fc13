//! Reconciliation ledger.
//!
//! The ledger maps each source identifier to the id the remote catalogue
//! assigned on creation, together with the last action taken. It is read
//! once before a run, changed only through [`LedgerDelta`]s produced by
//! successful jobs, and written back as JSON:
//!
//! ```json
//! {
//!   "watermark": "2024-05-02T06:00:00Z",
//!   "datasets": {
//!     "https://data.bl.ch/explore/dataset/12060/": { "id": "7f3c...", "status": "created" }
//!   }
//! }
//! ```
//!
//! Older files holding only the flat `{identifier: {"id": ...}}` map, possibly
//! encoded a second time as a JSON string, are read as well.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};

/// Last action recorded for a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Created in the remote catalogue.
    #[default]
    Created,
    /// Updated in the remote catalogue.
    Updated,
}

/// One ledger row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Remote catalogue id.
    pub id: String,
    /// Last action.
    #[serde(default)]
    pub status: EntryStatus,
}

/// Source identifier → remote id table plus the watermark of the last
/// successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Ledger {
    watermark: Option<DateTime<Utc>>,
    datasets: IndexMap<String, LedgerEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerFile {
    Current(Ledger),
    Legacy(IndexMap<String, LedgerEntry>),
    Encoded(String),
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from `(identifier, remote id)` pairs.
    pub fn from_ids<I, K, V>(ids: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            watermark: None,
            datasets: ids
                .into_iter()
                .map(|(key, id)| {
                    (
                        key.into(),
                        LedgerEntry {
                            id: id.into(),
                            status: EntryStatus::Created,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Watermark of the last run that finished without errors.
    #[must_use]
    pub const fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }

    /// Returns the entry for a source identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&LedgerEntry> {
        self.datasets.get(identifier)
    }

    /// Returns true if the identifier has been registered.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.datasets.contains_key(identifier)
    }

    /// Number of registered datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Iterates over `(identifier, entry)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &LedgerEntry)> {
        self.datasets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges a delta: entries are inserted or replaced, and the watermark
    /// advances if the delta carries one.
    pub fn apply(&mut self, delta: LedgerDelta) {
        for (identifier, entry) in delta.entries {
            self.datasets.insert(identifier, entry);
        }
        if let Some(watermark) = delta.watermark {
            self.watermark = Some(watermark);
        }
    }

    /// Parses a ledger document in the current or the legacy format.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::LedgerCorrupt`] if the text is not a ledger.
    pub fn parse(text: &str) -> Result<Self> {
        let file: LedgerFile =
            serde_json::from_str(text).map_err(|e| HarvestError::LedgerCorrupt(e.to_string()))?;
        match file {
            LedgerFile::Current(ledger) => Ok(ledger),
            LedgerFile::Legacy(datasets) => Ok(Self {
                watermark: None,
                datasets,
            }),
            LedgerFile::Encoded(inner) => Self::parse(&inner),
        }
    }

    /// Reads a ledger file. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::LedgerCorrupt`] if the file is malformed, or
    /// an IO error if it cannot be read.
    pub fn try_load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a ledger file, falling back to `seed`.
    ///
    /// The seed is used when the file does not exist yet and when it cannot
    /// be read. A corrupt ledger is logged and replaced by the seed, so
    /// records registered since the seed was taken will be created again.
    #[must_use]
    pub fn load(path: &Path, seed: Self) -> Self {
        match Self::try_load(path) {
            Ok(Some(ledger)) => {
                log::info!("Loaded ledger with {} entries from {}", ledger.len(), path.display());
                ledger
            },
            Ok(None) => {
                log::info!("No ledger at {}, starting from seed", path.display());
                seed
            },
            Err(e) => {
                log::warn!("Ignoring ledger at {}: {e}", path.display());
                seed
            },
        }
    }

    /// Writes the ledger to `path`, replacing the previous file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = temp_path(path);
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        log::debug!("Saved ledger with {} entries to {}", self.len(), path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Changes to the ledger produced during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerDelta {
    entries: Vec<(String, LedgerEntry)>,
    watermark: Option<DateTime<Utc>>,
}

impl LedgerDelta {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful create.
    pub fn created(&mut self, identifier: impl Into<String>, remote_id: impl Into<String>) {
        self.entries.push((
            identifier.into(),
            LedgerEntry {
                id: remote_id.into(),
                status: EntryStatus::Created,
            },
        ));
    }

    /// Records a successful update.
    pub fn updated(&mut self, identifier: impl Into<String>, remote_id: impl Into<String>) {
        self.entries.push((
            identifier.into(),
            LedgerEntry {
                id: remote_id.into(),
                status: EntryStatus::Updated,
            },
        ));
    }

    /// Sets the watermark to store with the ledger.
    pub fn advance_watermark(&mut self, watermark: DateTime<Utc>) {
        self.watermark = Some(watermark);
    }

    /// Appends the changes of another delta.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
        if other.watermark.is_some() {
            self.watermark = other.watermark;
        }
    }

    /// Number of entry changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the delta changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.watermark.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_apply_delta() {
        let mut ledger = Ledger::from_ids([("a", "id-a")]);
        let mut delta = LedgerDelta::new();
        delta.created("b", "id-b");
        delta.updated("a", "id-a");
        let mark = Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap();
        delta.advance_watermark(mark);

        ledger.apply(delta);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("a").unwrap().status, EntryStatus::Updated);
        assert_eq!(ledger.get("b").unwrap().id, "id-b");
        assert_eq!(ledger.watermark(), Some(mark));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("ledger.json");

        let mut ledger = Ledger::from_ids([("x", "1")]);
        let mut delta = LedgerDelta::new();
        delta.advance_watermark(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        ledger.apply(delta);
        ledger.save(&path).unwrap();

        assert!(!dir.path().join("state").join("ledger.json.tmp").exists());
        let loaded = Ledger::load(&path, Ledger::new());
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        let seed = Ledger::from_ids([("seeded", "s-1")]);

        assert!(Ledger::try_load(&path).unwrap().is_none());
        assert_eq!(Ledger::load(&path, seed.clone()), seed);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Ledger::try_load(&path),
            Err(HarvestError::LedgerCorrupt(_))
        ));
        assert_eq!(Ledger::load(&path, seed.clone()), seed);
    }

    #[test]
    fn test_legacy_formats() {
        let legacy = r#"{"ds-1": {"id": "r-1"}, "ds-2": {"id": "r-2"}}"#;
        let ledger = Ledger::parse(legacy).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("ds-2").unwrap().id, "r-2");
        assert_eq!(ledger.watermark(), None);

        let encoded = serde_json::to_string(legacy).unwrap();
        assert_eq!(Ledger::parse(&encoded).unwrap(), ledger);

        let current = r#"{"watermark": null, "datasets": {"ds-1": {"id": "r-1", "status": "updated"}}}"#;
        let ledger = Ledger::parse(current).unwrap();
        assert_eq!(ledger.get("ds-1").unwrap().status, EntryStatus::Updated);
    }
}
