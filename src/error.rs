//! Error types for harvesting operations.
//!
//! This module provides the [`HarvestError`] type for faults raised while
//! parsing sources, talking to the remote catalogue, or persisting the ledger,
//! and the [`Result`] convenience type.
//!
//! Expected outcomes of the mapping pipeline are not errors: a dataset that is
//! rejected for lacking valid distributions is reported through
//! [`crate::mapping::MappingOutcome::Rejected`].

use thiserror::Error;

/// Error type for all harvester operations.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Source RDF could not be parsed.
    #[error("RDF parse error: {0}")]
    RdfParse(String),

    /// A create/update/delete (or status) call against the remote catalogue failed.
    #[error("Remote {operation} failed{}: {message}", http_status_suffix(.status))]
    RemoteCall {
        /// The remote operation that was attempted (e.g. `create`).
        operation: &'static str,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Response body or transport error message.
        message: String,
    },

    /// The ledger file exists but could not be read or decoded.
    #[error("Ledger corrupt: {0}")]
    LedgerCorrupt(String),

    /// The source catalogue returned something unusable.
    #[error("Source error: {0}")]
    Source(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A synchronization run finished with failed records.
    #[error("Synchronization finished with {errors} failed record(s)")]
    RunFailed {
        /// Number of records whose job failed.
        errors: usize,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with HTTP {s}")).unwrap_or_default()
}

impl HarvestError {
    /// Builds a [`HarvestError::RemoteCall`] without an HTTP status.
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            operation,
            status: None,
            message: message.into(),
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`HarvestError`].
pub type Result<T> = std::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_call_display() {
        let err = HarvestError::RemoteCall {
            operation: "create",
            status: Some(409),
            message: "duplicate identifier".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Remote create failed with HTTP 409: duplicate identifier"
        );

        let err = HarvestError::remote("update", "connection reset");
        assert_eq!(err.to_string(), "Remote update failed: connection reset");
    }

    #[test]
    fn test_run_failed_display() {
        let err = HarvestError::RunFailed { errors: 3 };
        assert_eq!(
            err.to_string(),
            "Synchronization finished with 3 failed record(s)"
        );
    }
}
