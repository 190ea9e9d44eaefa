//! External process execution events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Command descriptor used for process events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommandDescriptor {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    ProcessStarted {
        command: ProcessCommandDescriptor,
    },

    /// Process ran to completion (any exit code)
    ProcessCompleted {
        command: ProcessCommandDescriptor,
        exit_code: Option<i32>,
        duration_ms: u64,
    },

    /// Process could not be spawned or exceeded its timeout
    ProcessFailed {
        command: ProcessCommandDescriptor,
        failure: FailureContext,
        duration_ms: u64,
    },
}
