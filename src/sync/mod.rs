//! Idempotent synchronization of a source catalogue into the remote catalogue.
//!
//! A run proceeds in three phases:
//!
//! 1. **Plan:** every listed source record is classified against the cutoff
//!    ([`classify`]) and looked up in the ledger ([`plan`]). Records that are
//!    registered and unchanged are skipped without any remote call.
//! 2. **Execute:** the remaining records become jobs on a bounded
//!    [`WorkerPool`]. A job fetches and maps its record, then issues the
//!    create or update call. Each job returns its own [`LedgerDelta`].
//! 3. **Collect:** the calling thread folds job results into a
//!    [`RunSummary`] and one merged delta. The watermark only advances when
//!    no job failed.
//!
//! Failures are per record: a failed job is recorded and the run goes on.
//! [`RunSummary::into_result`] turns a run with failures into an error once
//! everything has been attempted.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use crate::ledger::{Ledger, LedgerDelta};
use crate::mapping::{MappingOutcome, MappingWarning, Rejection};
use crate::remote::CatalogClient;
use crate::source::{SourceCatalog, SourceEntry};

mod pool;
mod summary;

pub use pool::WorkerPool;
pub use summary::RunSummary;

/// How a source record moved relative to the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChange {
    /// Created after the cutoff.
    New,
    /// Modified after the cutoff.
    Changed,
    /// Neither created nor modified after the cutoff.
    Unchanged,
}

/// Classifies a source record against `cutoff`.
///
/// A record created after the cutoff is `New` even if it was also modified.
/// Without a cutoff every record is `New`; a record without timestamps is
/// `Unchanged`.
#[must_use]
pub fn classify(entry: &SourceEntry, cutoff: Option<DateTime<Utc>>) -> SourceChange {
    let Some(cutoff) = cutoff else {
        return SourceChange::New;
    };
    if entry.created.is_some_and(|created| created > cutoff) {
        SourceChange::New
    } else if entry.changed.is_some_and(|changed| changed > cutoff) {
        SourceChange::Changed
    } else {
        SourceChange::Unchanged
    }
}

/// What the synchronizer does with one source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Not registered yet: create it remotely.
    Create,
    /// Registered and changed: replace the remote record.
    Update {
        /// Id assigned by the remote catalogue.
        remote_id: String,
    },
    /// Registered and unchanged.
    Skip,
}

/// Decides the action for one record.
#[must_use]
pub fn plan(entry: &SourceEntry, ledger: &Ledger, cutoff: Option<DateTime<Utc>>) -> SyncAction {
    match ledger.get(&entry.identifier) {
        None => SyncAction::Create,
        Some(registered) => match classify(entry, cutoff) {
            SourceChange::Unchanged => SyncAction::Skip,
            SourceChange::New | SourceChange::Changed => SyncAction::Update {
                remote_id: registered.id.clone(),
            },
        },
    }
}

/// Result of [`Synchronizer::run`]: what happened plus the ledger changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Per-record outcome lists.
    pub summary: RunSummary,
    /// Changes to apply to the ledger the run started from.
    pub delta: LedgerDelta,
}

#[derive(Debug)]
struct Job {
    entry: SourceEntry,
    action: SyncAction,
}

#[derive(Debug)]
enum JobOutcome {
    Created,
    Updated,
    Skipped,
    Rejected(Rejection),
    Failed(HarvestError),
}

#[derive(Debug)]
struct JobResult {
    identifier: String,
    outcome: JobOutcome,
    warnings: Vec<MappingWarning>,
    delta: LedgerDelta,
}

/// Drives one source catalogue into the remote catalogue.
///
/// # Examples
///
/// ```ignore
/// use dcat_harvester::{HarvestConfig, Ledger, Synchronizer};
///
/// let config = HarvestConfig::new("CH_KT_BL");
/// let sync = Synchronizer::new(&config, &source, &client);
/// let report = sync.run(&Ledger::new())?;
/// println!("{}", report.summary.render());
/// ```
#[derive(Debug)]
pub struct Synchronizer<'a, S: ?Sized, C: ?Sized> {
    config: &'a HarvestConfig,
    source: &'a S,
    client: &'a C,
}

impl<'a, S, C> Synchronizer<'a, S, C>
where
    S: SourceCatalog + ?Sized,
    C: CatalogClient + ?Sized,
{
    /// Creates a synchronizer.
    #[must_use]
    pub const fn new(config: &'a HarvestConfig, source: &'a S, client: &'a C) -> Self {
        Self {
            config,
            source,
            client,
        }
    }

    /// Runs against a ledger snapshot, using the current time as run start.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source cannot be listed. Per-record
    /// failures are reported in the summary.
    pub fn run(&self, ledger: &Ledger) -> Result<SyncReport> {
        self.run_at(ledger, Utc::now())
    }

    /// Runs against a ledger snapshot with an explicit run start.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source cannot be listed.
    pub fn run_at(&self, ledger: &Ledger, now: DateTime<Utc>) -> Result<SyncReport> {
        self.run_inner(ledger, now, |_| {})
    }

    /// Loads the ledger from `path` (falling back to `seed`), runs, and saves
    /// the updated ledger.
    ///
    /// The ledger file is also rewritten after every successful job.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be listed or the final ledger
    /// cannot be written.
    pub fn run_with_store(&self, path: &Path, seed: Ledger) -> Result<RunSummary> {
        let mut ledger = Ledger::load(path, seed);
        let mut checkpoint = ledger.clone();

        let report = self.run_inner(&ledger, Utc::now(), |delta| {
            checkpoint.apply(delta.clone());
            if let Err(e) = checkpoint.save(path) {
                log::warn!("Could not checkpoint ledger: {e}");
            }
        })?;

        ledger.apply(report.delta);
        ledger.save(path)?;
        Ok(report.summary)
    }

    fn run_inner<F>(&self, ledger: &Ledger, now: DateTime<Utc>, mut on_success: F) -> Result<SyncReport>
    where
        F: FnMut(&LedgerDelta),
    {
        let cutoff = self.config.watermark.cutoff(ledger, now);
        let entries = self.source.list()?;
        log::info!(
            "Synchronizing {} source records (cutoff: {})",
            entries.len(),
            cutoff.map_or_else(|| "none".to_string(), |c| c.to_rfc3339())
        );

        let mut summary = RunSummary::new(now);
        let mut jobs = Vec::new();
        for entry in entries {
            match plan(&entry, ledger, cutoff) {
                SyncAction::Skip => summary.skipped.push(entry.identifier),
                action => jobs.push(Job { entry, action }),
            }
        }
        log::info!(
            "{} records to write, {} unchanged",
            jobs.len(),
            summary.skipped.len()
        );

        let mut delta = LedgerDelta::new();
        let pool = WorkerPool::new(self.config.max_workers);
        pool.run(
            jobs,
            |job| self.execute(job),
            |result| {
                if !result.delta.is_empty() {
                    on_success(&result.delta);
                }
                delta.merge(result.delta);
                summary
                    .warnings
                    .extend(result.warnings.iter().map(ToString::to_string));
                match result.outcome {
                    JobOutcome::Created => summary.created.push(result.identifier),
                    JobOutcome::Updated => summary.updated.push(result.identifier),
                    JobOutcome::Skipped => summary.skipped.push(result.identifier),
                    JobOutcome::Rejected(reason) => summary.reject(result.identifier, reason),
                    JobOutcome::Failed(error) => {
                        log::warn!("{}: {error}", result.identifier);
                        summary.fail(result.identifier, &error);
                    },
                }
            },
        );

        sort_summary(&mut summary);
        summary.finished_at = Some(Utc::now());
        if summary.is_success() {
            delta.advance_watermark(now);
        }
        log::info!(
            "Run finished: {} created, {} updated, {} unchanged, {} rejected, {} failed",
            summary.created.len(),
            summary.updated.len(),
            summary.skipped.len(),
            summary.rejected.len(),
            summary.error_count()
        );

        Ok(SyncReport { summary, delta })
    }

    fn execute(&self, job: Job) -> JobResult {
        let mut warnings = Vec::new();
        let mut delta = LedgerDelta::new();
        let outcome = self
            .write(&job, &mut warnings, &mut delta)
            .unwrap_or_else(JobOutcome::Failed);
        JobResult {
            identifier: job.entry.identifier,
            outcome,
            warnings,
            delta,
        }
    }

    fn write(
        &self,
        job: &Job,
        warnings: &mut Vec<MappingWarning>,
        delta: &mut LedgerDelta,
    ) -> Result<JobOutcome> {
        let identifier = &job.entry.identifier;
        let extraction = self.source.fetch(&job.entry)?.map(self.config)?;
        *warnings = extraction.warnings;
        let dataset = match extraction.outcome {
            MappingOutcome::Mapped(dataset) => dataset,
            MappingOutcome::Rejected(reason) => {
                log::debug!("{identifier}: rejected ({reason})");
                return Ok(JobOutcome::Rejected(reason));
            },
        };
        let document = dataset.to_document()?;

        match &job.action {
            SyncAction::Create => {
                let remote_id = self.client.create(&document)?;
                log::debug!("{identifier}: created as {remote_id}");
                delta.created(identifier.as_str(), remote_id.as_str());
                self.publish(&remote_id)?;
                Ok(JobOutcome::Created)
            },
            SyncAction::Update { remote_id } => {
                self.client.update(remote_id, &document)?;
                log::debug!("{identifier}: updated {remote_id}");
                delta.updated(identifier.as_str(), remote_id.as_str());
                Ok(JobOutcome::Updated)
            },
            SyncAction::Skip => Ok(JobOutcome::Skipped),
        }
    }

    fn publish(&self, remote_id: &str) -> Result<()> {
        let publication = &self.config.publication;
        if let Some(level) = &publication.level {
            self.client.set_publication_level(remote_id, level)?;
        }
        if let Some(status) = &publication.registration_status {
            self.client.set_registration_status(remote_id, status)?;
        }
        Ok(())
    }
}

// Jobs finish in any order; sort so logs are comparable between runs
fn sort_summary(summary: &mut RunSummary) {
    summary.created.sort();
    summary.updated.sort();
    summary.skipped.sort();
    summary.rejected.sort();
    summary.errors.sort();
}
