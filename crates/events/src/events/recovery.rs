use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Events emitted by the backup restorer and the remote publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecoveryEvent {
    RestoreStarted {
        file: String,
        sources: usize,
    },

    /// A backup source had the file but fetching it failed; scanning continues
    SourceSkipped {
        file: String,
        source: String,
        reason: String,
    },

    Restored {
        file: String,
        source: String,
    },

    /// No source yielded the file
    RestoreFailed {
        file: String,
    },

    CloneStarted {
        file: String,
        repository: String,
        destination: String,
    },

    CloneReused {
        file: String,
        repository: String,
        path: String,
    },

    PublishStep {
        file: String,
        repository: String,
        step: String,
    },

    Published {
        file: String,
        repository: String,
    },

    PublishFailed {
        file: String,
        repository: String,
        step: String,
        failure: FailureContext,
    },
}

impl RecoveryEvent {
    /// File this event refers to
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::RestoreStarted { file, .. }
            | Self::SourceSkipped { file, .. }
            | Self::Restored { file, .. }
            | Self::RestoreFailed { file }
            | Self::CloneStarted { file, .. }
            | Self::CloneReused { file, .. }
            | Self::PublishStep { file, .. }
            | Self::Published { file, .. }
            | Self::PublishFailed { file, .. } => file,
        }
    }
}
