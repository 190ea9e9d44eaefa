//! Event handling and status display

use console::Style;
use safeprune_events::{
    AppEvent, EventMessage, GeneralEvent, HealthEvent, RecoveryEvent, VerificationEvent,
};

use crate::logging::log_event_with_tracing;

/// Turns domain events into status lines and tracing records
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
    /// Status lines are suppressed in JSON mode so stdout stays parseable
    show_status_lines: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, show_status_lines: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            show_status_lines,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: &EventMessage) {
        log_event_with_tracing(message);

        if !self.show_status_lines {
            return;
        }

        match &message.event {
            AppEvent::Verification(event) => self.handle_verification(event),
            AppEvent::Recovery(event) => self.handle_recovery(event),
            AppEvent::Health(event) => self.handle_health(event),
            AppEvent::General(event) => self.handle_general(event),
            // Process lifecycle only goes to the log
            AppEvent::Platform(_) => {}
        }
    }

    fn handle_verification(&self, event: &VerificationEvent) {
        match event {
            VerificationEvent::Started { total, owner } => {
                self.show_status(&format!("Verifying {total} file(s) against {owner}"));
            }
            VerificationEvent::FileClassified { file, safe, reason } => {
                if *safe {
                    self.show_success(&format!("SAFE: {file} - {reason}"));
                } else {
                    self.show_warning(&format!("UNSAFE: {file} - {reason}"));
                }
            }
            VerificationEvent::MalformedResponse { file, message } => {
                self.show_warning(&format!("Unreadable search response for {file}: {message}"));
            }
            VerificationEvent::ReportWritten { path } => {
                self.show_status(&format!("Report written to {path}"));
            }
            VerificationEvent::FileQueried { file } => {
                if self.debug_enabled {
                    self.show_status(&format!("Searching for {file}"));
                }
            }
            VerificationEvent::Completed { .. } => {}
        }
    }

    fn handle_recovery(&self, event: &RecoveryEvent) {
        match event {
            RecoveryEvent::RestoreStarted { file, sources } => {
                self.show_status(&format!("Restoring {file} ({sources} backup sources)"));
            }
            RecoveryEvent::SourceSkipped {
                file,
                source,
                reason,
            } => {
                if self.debug_enabled {
                    self.show_status(&format!("  {source}: skipped for {file} ({reason})"));
                }
            }
            RecoveryEvent::Restored { file, source } => {
                self.show_success(&format!("Restored {file} from {source}"));
            }
            RecoveryEvent::RestoreFailed { file } => {
                self.show_error(&format!("No backup of {file} found"));
            }
            RecoveryEvent::CloneStarted {
                repository,
                destination,
                ..
            } => {
                self.show_status(&format!("Cloning {repository} into {destination}"));
            }
            RecoveryEvent::CloneReused { repository, .. } => {
                if self.debug_enabled {
                    self.show_status(&format!("Reusing clone of {repository}"));
                }
            }
            RecoveryEvent::PublishStep {
                file,
                repository,
                step,
            } => {
                if self.debug_enabled {
                    self.show_status(&format!("  {step}: {file} -> {repository}"));
                }
            }
            RecoveryEvent::Published { file, repository } => {
                self.show_success(&format!("Published {file} to {repository}"));
            }
            RecoveryEvent::PublishFailed {
                file,
                repository,
                step,
                failure,
            } => {
                self.show_error(&format!(
                    "Publishing {file} to {repository} failed at {step}: {}",
                    failure.message
                ));
            }
        }
    }

    fn handle_health(&self, event: &HealthEvent) {
        match event {
            HealthEvent::SuiteStarted { total } => {
                self.show_status(&format!("Running {total} health checks"));
            }
            HealthEvent::ProbeStarted { name } => {
                if self.debug_enabled {
                    self.show_status(&format!("Checking {name}"));
                }
            }
            HealthEvent::ProbePassed { name } => self.show_success(&format!("PASS {name}")),
            HealthEvent::ProbeFailed { name, message } => match message {
                Some(message) => self.show_error(&format!("FAIL {name}: {message}")),
                None => self.show_error(&format!("FAIL {name}")),
            },
            HealthEvent::ReportWritten { path } => {
                self.show_status(&format!("Report written to {path}"));
            }
            HealthEvent::SuiteCompleted { .. } => {}
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message}: {context}")),
                None => self.show_warning(message),
            },
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
            GeneralEvent::OperationStarted { .. } | GeneralEvent::OperationCompleted { .. } => {}
        }
    }

    fn styled(&self, style: &Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn show_status(&self, message: &str) {
        println!("{}", self.styled(&Style::new(), message));
    }

    fn show_success(&self, message: &str) {
        println!("{}", self.styled(&Style::new().green(), message));
    }

    fn show_warning(&self, message: &str) {
        println!("{}", self.styled(&Style::new().yellow(), message));
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", self.styled(&Style::new().red().bold(), message));
    }
}
