//! Cleanup report artifact

use chrono::SecondsFormat;
use safeprune_errors::ReportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classifier::ClassificationReport;

const ARTIFACT: &str = "cleanup report";

/// Persisted form of a classification.
///
/// File lists hold `[name, reason]` pairs in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub total_files: usize,
    pub safe_to_delete: usize,
    pub unsafe_to_delete: usize,
    pub safe_files: Vec<(String, String)>,
    pub unsafe_files: Vec<(String, String)>,
    pub verification_timestamp: String,
}

impl From<&ClassificationReport> for CleanupReport {
    fn from(classification: &ClassificationReport) -> Self {
        let pairs = |safe: bool| {
            classification
                .verdicts
                .iter()
                .filter(|v| v.safe == safe)
                .map(|v| (v.file.clone(), v.reason.clone()))
                .collect::<Vec<_>>()
        };
        let safe_files = pairs(true);
        let unsafe_files = pairs(false);

        Self {
            total_files: classification.total(),
            safe_to_delete: safe_files.len(),
            unsafe_to_delete: unsafe_files.len(),
            safe_files,
            unsafe_files,
            verification_timestamp: classification
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Write `report` to `path`, replacing any previous artifact.
///
/// Parent directories are created.
///
/// # Errors
///
/// Returns `ReportError` when serialization or the write fails. Callers must
/// not treat this as a classification failure.
pub async fn write_report(report: &CleanupReport, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| ReportError::SerializeFailed {
        artifact: ARTIFACT.to_string(),
        message: e.to_string(),
    })?;

    let write_failed = |e: std::io::Error| ReportError::WriteFailed {
        artifact: ARTIFACT.to_string(),
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }
    tokio::fs::write(path, json).await.map_err(write_failed)?;
    tracing::info!(path = %path.display(), "cleanup report written");
    Ok(())
}
