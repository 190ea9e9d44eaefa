//! Process and filesystem operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur while running external tools or touching the filesystem
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("process timed out after {timeout_secs}s: {command}")]
    ProcessTimedOut { command: String, timeout_secs: u64 },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some("Install the missing tool and make sure it is on PATH."),
            Self::ProcessTimedOut { .. } => Some("Check network connectivity or raise the timeout."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ProcessTimedOut { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::ProcessTimedOut { .. } => "platform.process_timeout",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::FilesystemOperationFailed { .. } => "platform.filesystem",
        })
    }
}
