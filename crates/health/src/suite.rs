//! Suite runner and report

use chrono::{SecondsFormat, Utc};
use futures::FutureExt;
use safeprune_errors::{ReportError, UserFacingError};
use safeprune_events::{AppEvent, EventEmitter, EventSender, HealthEvent};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use crate::probe::Probe;

const ARTIFACT: &str = "health report";

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub name: String,
    pub passed: bool,
    /// Error or panic text for probes that did not return cleanly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Healthy,
    IssuesDetected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub timestamp: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub success_rate: f64,
    pub test_results: Vec<HealthCheckResult>,
    pub system_status: SystemStatus,
}

impl TestReport {
    fn from_results(test_results: Vec<HealthCheckResult>) -> Self {
        let total_tests = test_results.len();
        let passed_tests = test_results.iter().filter(|r| r.passed).count();
        let failed_tests = total_tests - passed_tests;

        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_tests,
            passed_tests,
            failed_tests,
            success_rate: success_rate(passed_tests, total_tests),
            test_results,
            system_status: if failed_tests == 0 {
                SystemStatus::Healthy
            } else {
                SystemStatus::IssuesDetected
            },
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.system_status == SystemStatus::Healthy
    }
}

/// Percentage of passed probes; 0 for an empty suite
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("probe panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("probe panicked: {s}")
    } else {
        "probe panicked".to_string()
    }
}

/// Ordered probe list plus an optional event listener
pub struct HealthSuite {
    probes: Vec<Box<dyn Probe>>,
    event_sender: Option<EventSender>,
}

impl EventEmitter for HealthSuite {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl HealthSuite {
    #[must_use]
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self {
            probes,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Run every probe in order and aggregate
    pub async fn run(&self) -> TestReport {
        self.emit(AppEvent::Health(HealthEvent::SuiteStarted {
            total: self.probes.len(),
        }));

        let mut results = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            results.push(self.run_probe(probe.as_ref()).await);
        }

        let report = TestReport::from_results(results);
        self.emit(AppEvent::Health(HealthEvent::SuiteCompleted {
            passed: report.passed_tests,
            failed: report.failed_tests,
            success_rate: report.success_rate,
        }));
        report
    }

    async fn run_probe(&self, probe: &dyn Probe) -> HealthCheckResult {
        let name = probe.name().to_string();
        self.emit(AppEvent::Health(HealthEvent::ProbeStarted { name: name.clone() }));

        let (passed, message) = match AssertUnwindSafe(probe.check()).catch_unwind().await {
            Ok(Ok(passed)) => (passed, None),
            Ok(Err(e)) => (false, Some(e.user_message().into_owned())),
            Err(payload) => (false, Some(panic_message(payload.as_ref()))),
        };

        if passed {
            self.emit(AppEvent::Health(HealthEvent::ProbePassed { name: name.clone() }));
        } else {
            self.emit(AppEvent::Health(HealthEvent::ProbeFailed {
                name: name.clone(),
                message: message.clone(),
            }));
        }

        HealthCheckResult {
            name,
            passed,
            message,
        }
    }
}

/// Write the report to `path`, replacing any previous one
///
/// # Errors
///
/// Returns `ReportError` if serialization or the write fails.
pub async fn write_report(report: &TestReport, path: &Path) -> Result<(), ReportError> {
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
    tokio::fs::write(path, json).await.map_err(write_failed)
}
