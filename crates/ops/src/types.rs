//! Result types returned by operations

use safeprune_recovery::{PublishOutcome, RestoreOutcome};
use safeprune_verify::{CleanupReport, Verdict};
use serde::Serialize;
use std::path::PathBuf;

/// A classification run and the artifact it produced
#[derive(Clone, Debug, Serialize)]
pub struct VerifyReport {
    #[serde(flatten)]
    pub report: CleanupReport,
    pub report_path: PathBuf,
}

/// Outcome of restore, publish and re-verify for one file
#[derive(Clone, Debug, Serialize)]
pub struct RecoveryReport {
    pub file: String,
    pub repository: String,
    /// `None` when the file was already present locally
    pub restore: Option<RestoreOutcome>,
    /// `None` when there was nothing to publish
    pub publish: Option<PublishOutcome>,
    /// Classification after a successful publish
    pub verdict: Option<Verdict>,
}

impl RecoveryReport {
    /// The file reached the repository. Search indexing can lag behind a
    /// push, so an unsafe re-verification does not make this a failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.publish.as_ref().is_some_and(|p| p.published)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RepositoryContents {
    pub owner: String,
    pub repository: String,
    pub entries: Vec<String>,
}
