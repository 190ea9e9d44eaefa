use serde::{Deserialize, Serialize};

/// Events emitted while running the health check suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthEvent {
    SuiteStarted {
        total: usize,
    },

    ProbeStarted {
        name: String,
    },

    ProbePassed {
        name: String,
    },

    /// Probe returned false (`message` is `None`) or errored
    ProbeFailed {
        name: String,
        message: Option<String>,
    },

    SuiteCompleted {
        passed: usize,
        failed: usize,
        success_rate: f64,
    },

    ReportWritten {
        path: String,
    },
}

impl HealthEvent {
    /// Probe this event refers to, if any
    #[must_use]
    pub fn probe(&self) -> Option<&str> {
        match self {
            Self::ProbeStarted { name } | Self::ProbePassed { name } | Self::ProbeFailed { name, .. } => {
                Some(name)
            }
            Self::SuiteStarted { .. } | Self::SuiteCompleted { .. } | Self::ReportWritten { .. } => {
                None
            }
        }
    }
}
