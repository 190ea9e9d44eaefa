//! System health check operation

use safeprune_errors::Error;
use safeprune_events::{AppEvent, EventEmitter, HealthEvent};
use safeprune_health::{default_probes, write_report, HealthSuite, TestReport};
use std::path::Path;

use crate::OpsCtx;

/// Run the default probe suite and persist its report
///
/// # Errors
///
/// Returns an error if the report cannot be written. Probe failures are
/// recorded in the report instead.
pub async fn check_health(ctx: &OpsCtx, report_path: Option<&Path>) -> Result<TestReport, Error> {
    ctx.emit_operation_started("check-health");

    let env = ctx.probe_env();
    let report = HealthSuite::new(default_probes(&env))
        .with_event_sender(ctx.tx.clone())
        .run()
        .await;

    let path = report_path.map_or_else(|| ctx.config.health_report_path(), |p| ctx.resolve(p));
    write_report(&report, &path).await?;

    ctx.emit(AppEvent::Health(HealthEvent::ReportWritten {
        path: path.display().to_string(),
    }));
    ctx.emit_operation_completed("check-health", report.is_healthy());
    Ok(report)
}
