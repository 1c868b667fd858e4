//! Error types for the harness.

use std::path::PathBuf;

use pgmspace_core::LayoutError;

use crate::execute::ExecError;

/// Anything that can stop a harness command.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("invalid region base: {0}")]
    Layout(#[from] LayoutError),
    #[error("verification failed: {failed} of {total} cases")]
    VerificationFailed { failed: usize, total: usize },
    #[error("sweep found {0} mismatches")]
    SweepMismatch(usize),
}
