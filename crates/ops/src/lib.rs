#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for safeprune
//!
//! This crate sits between the CLI and the domain crates. Each operation
//! takes an [`OpsCtx`], does its work through the domain crates and returns
//! a serializable result.

mod context;
mod health;
mod query;
mod recovery;
mod types;
mod verify;

pub use context::{OpsContextBuilder, OpsCtx};
pub use types::{RecoveryReport, RepositoryContents, VerifyReport};

pub use health::check_health;
pub use query::repository_contents;
pub use recovery::{publish_file, recover_file, restore_file};
pub use verify::verify_files;

use safeprune_errors::Error;
use safeprune_health::TestReport;
use safeprune_recovery::{PublishOutcome, RestoreOutcome};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Classification of candidate files and where its report went
    Verification(VerifyReport),
    Restore(RestoreOutcome),
    Publish(PublishOutcome),
    Recovery(RecoveryReport),
    /// Top-level listing of a repository
    Contents(RepositoryContents),
    HealthCheck(TestReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            safeprune_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Whether the operation achieved what was asked.
    ///
    /// A verification that found unsafe files still succeeded, as did a
    /// restore that found no backup.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Verification(_)
            | OperationResult::Restore(_)
            | OperationResult::Contents(_) => true,
            OperationResult::Publish(outcome) => outcome.published,
            OperationResult::Recovery(report) => report.is_success(),
            OperationResult::HealthCheck(report) => report.is_healthy(),
        }
    }
}
