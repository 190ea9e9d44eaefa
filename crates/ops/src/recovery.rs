//! Restore, publish and combined recovery operations

use safeprune_errors::{Error, OpsError};
use safeprune_events::EventEmitter;
use safeprune_platform::fs;
use safeprune_recovery::{PublishOutcome, RestoreOutcome};
use std::path::{Component, Path};

use crate::{OpsCtx, RecoveryReport};

/// Reject names that would escape the working directory
fn validate_file_name(name: &str) -> Result<(), OpsError> {
    let invalid = |reason: &str| OpsError::InvalidFileName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("empty name"));
    }
    let path = Path::new(name);
    if path.is_absolute() {
        return Err(invalid("absolute path"));
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(invalid("parent directory component"));
    }
    Ok(())
}

/// Restore `file` from the first backup source holding it.
///
/// # Errors
///
/// Returns an error only for an invalid file name. Finding no backup is a
/// normal outcome.
pub async fn restore_file(ctx: &OpsCtx, file: &str) -> Result<RestoreOutcome, Error> {
    validate_file_name(file)?;
    ctx.emit_operation_started("restore");
    let outcome = ctx.restorer().restore(file).await;
    ctx.emit_operation_completed("restore", outcome.restored);
    Ok(outcome)
}

/// Publish a local file into `repository`.
///
/// # Errors
///
/// Returns an error only for an invalid file name. Step failures are
/// reported in the outcome.
pub async fn publish_file(
    ctx: &OpsCtx,
    file: &str,
    repository: &str,
) -> Result<PublishOutcome, Error> {
    validate_file_name(file)?;
    validate_file_name(repository)?;
    ctx.emit_operation_started("publish");
    let outcome = ctx.publisher().publish(file, repository).await;
    ctx.emit_operation_completed("publish", outcome.published);
    Ok(outcome)
}

/// Bring an unsafe file back into a safe state: restore it if it is missing
/// locally, publish it, then verify it again.
///
/// # Errors
///
/// Returns an error only for an invalid file or repository name.
pub async fn recover_file(
    ctx: &OpsCtx,
    file: &str,
    repository: &str,
) -> Result<RecoveryReport, Error> {
    validate_file_name(file)?;
    validate_file_name(repository)?;
    ctx.emit_operation_started("recover");

    let mut report = RecoveryReport {
        file: file.to_string(),
        repository: repository.to_string(),
        restore: None,
        publish: None,
        verdict: None,
    };

    if !fs::is_file(&ctx.work_dir().join(file)).await {
        let outcome = ctx.restorer().restore(file).await;
        let restored = outcome.restored;
        report.restore = Some(outcome);
        if !restored {
            ctx.emit_operation_completed("recover", false);
            return Ok(report);
        }
    }

    let published = ctx.publisher().publish(file, repository).await;
    let ok = published.published;
    report.publish = Some(published);

    if ok {
        report.verdict = Some(ctx.classifier().verify_file(file).await);
    }

    ctx.emit_operation_completed("recover", report.is_success());
    Ok(report)
}
