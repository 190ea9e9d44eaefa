//! Structured logging integration for events
//!
//! Every event the CLI receives is also recorded through `tracing`, at the
//! level the event reports for itself, with its metadata as fields.

use safeprune_events::{
    AppEvent, EventMessage, HealthEvent, PlatformEvent, RecoveryEvent, VerificationEvent,
};
use tracing::{debug, error, info, trace, warn, Level};

/// Log an event at its own level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Verification(VerificationEvent::FileClassified { file, safe, reason }) => {
            let level = meta.tracing_level();
            if level == Level::WARN {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    file = %file,
                    safe = safe,
                    reason = %reason,
                    "File classified"
                );
            } else {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    file = %file,
                    safe = safe,
                    reason = %reason,
                    "File classified"
                );
            }
        }

        AppEvent::Verification(VerificationEvent::Completed {
            total,
            safe,
            unsafe_count,
        }) => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                total = total,
                safe = safe,
                unsafe_count = unsafe_count,
                "Verification completed"
            );
        }

        AppEvent::Recovery(RecoveryEvent::PublishFailed {
            file,
            repository,
            step,
            failure,
        }) => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                file = %file,
                repository = %repository,
                step = %step,
                retryable = failure.retryable,
                code = ?failure.code,
                message = %failure.message,
                hint = ?failure.hint,
                "Publish failed"
            );
        }

        AppEvent::Recovery(RecoveryEvent::Restored { file, source }) => {
            info!(
                event_id = %meta.event_id,
                file = %file,
                backup = %source,
                "File restored"
            );
        }

        AppEvent::Health(HealthEvent::SuiteCompleted {
            passed,
            failed,
            success_rate,
        }) => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                passed = passed,
                failed = failed,
                success_rate = success_rate,
                "Health suite completed"
            );
        }

        AppEvent::Platform(PlatformEvent::ProcessFailed {
            command,
            failure,
            duration_ms,
        }) => {
            error!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                program = %command.program,
                args = ?command.args,
                cwd = ?command.cwd,
                duration_ms = duration_ms,
                code = ?failure.code,
                message = %failure.message,
                "Process failed"
            );
        }

        AppEvent::Platform(PlatformEvent::ProcessCompleted {
            command,
            exit_code,
            duration_ms,
        }) => {
            debug!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                program = %command.program,
                args = ?command.args,
                cwd = ?command.cwd,
                exit_code = ?exit_code,
                duration_ms = duration_ms,
                "Process completed"
            );
        }

        // Everything else is logged whole
        _ => match meta.tracing_level() {
            Level::ERROR => {
                error!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event");
            }
            Level::WARN => {
                warn!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event");
            }
            Level::INFO => {
                info!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event");
            }
            Level::DEBUG => {
                debug!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event");
            }
            _ => {
                trace!(source = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, event = ?event, "Application event");
            }
        },
    }
}
