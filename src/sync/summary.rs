//! Per-run summary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{HarvestError, Result};
use crate::mapping::Rejection;

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the last job finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Identifiers created remotely.
    pub created: Vec<String>,
    /// Identifiers updated remotely.
    pub updated: Vec<String>,
    /// Identifiers left untouched because they did not change.
    pub skipped: Vec<String>,
    /// Identifiers the mapping rejected, with the reason.
    pub rejected: Vec<(String, String)>,
    /// Identifiers whose job failed, with the error message.
    pub errors: Vec<(String, String)>,
    /// Mapping warnings.
    pub warnings: Vec<String>,
}

impl RunSummary {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(started_at),
            ..Self::default()
        }
    }

    pub(crate) fn reject(&mut self, identifier: String, reason: Rejection) {
        self.rejected.push((identifier, reason.to_string()));
    }

    pub(crate) fn fail(&mut self, identifier: String, error: &HarvestError) {
        self.errors.push((identifier, error.to_string()));
    }

    /// Number of failed records.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no record failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of create and update calls that succeeded.
    #[must_use]
    pub fn remote_writes(&self) -> usize {
        self.created.len() + self.updated.len()
    }

    /// Renders the plain-text harvest log.
    #[must_use]
    pub fn render(&self) -> String {
        let mut log = String::new();
        let finished = self
            .finished_at
            .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
        if self.is_success() {
            let _ = writeln!(log, "Harvest completed successfully at {finished}");
        } else {
            let _ = writeln!(
                log,
                "Harvest finished with {} error(s) at {finished}",
                self.error_count()
            );
        }

        section(&mut log, "Created datasets", self.created.iter().map(String::as_str));
        section(&mut log, "Updated datasets", self.updated.iter().map(String::as_str));
        let _ = writeln!(log, "Unchanged datasets: {}", self.skipped.len());
        section(
            &mut log,
            "Rejected datasets",
            self.rejected.iter().map(|(id, reason)| format!("{id} ({reason})")),
        );
        section(
            &mut log,
            "Failed datasets",
            self.errors.iter().map(|(id, error)| format!("{id}: {error}")),
        );
        section(&mut log, "Warnings", self.warnings.iter().map(String::as_str));
        log
    }

    /// Writes [`Self::render`] to `path`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        Ok(())
    }

    /// Converts a run with failed records into [`HarvestError::RunFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RunFailed`] if any record failed.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HarvestError::RunFailed {
                errors: self.error_count(),
            })
        }
    }
}

fn section<I, S>(log: &mut String, title: &str, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let _ = writeln!(log, "{title}:");
    for item in items {
        let _ = writeln!(log, "- {}", item.as_ref());
    }
}
