//! Verification operation

use safeprune_errors::{Error, OpsError};
use safeprune_events::{AppEvent, EventEmitter, VerificationEvent};
use safeprune_verify::{write_report, CleanupReport};
use std::path::Path;

use crate::{OpsCtx, VerifyReport};

/// Classify candidate files and persist the cleanup report.
///
/// With no `files`, the configured candidates are used. The report goes to
/// `report_path`, or the configured location.
///
/// # Errors
///
/// Returns an error if there is nothing to verify or the report cannot be
/// written. Query failures are not errors; they classify files as unsafe.
pub async fn verify_files(
    ctx: &OpsCtx,
    files: &[String],
    report_path: Option<&Path>,
) -> Result<VerifyReport, Error> {
    let candidates = if files.is_empty() {
        ctx.config.cleanup.candidates.as_slice()
    } else {
        files
    };
    if candidates.is_empty() {
        return Err(OpsError::NoFilesSpecified.into());
    }

    ctx.emit_operation_started("verify");
    let classification = ctx.classifier().classify(candidates).await;
    let report = CleanupReport::from(&classification);

    let path = report_path.map_or_else(|| ctx.config.cleanup_report_path(), |p| ctx.resolve(p));

    if let Err(e) = write_report(&report, &path).await {
        ctx.emit_operation_failed("verify", e.to_string());
        return Err(e.into());
    }

    ctx.emit(AppEvent::Verification(VerificationEvent::ReportWritten {
        path: path.display().to_string(),
    }));
    ctx.emit_operation_completed("verify", true);

    Ok(VerifyReport {
        report,
        report_path: path,
    })
}
