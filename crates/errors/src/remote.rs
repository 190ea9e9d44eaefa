//! Remote source control error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("{operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("{operation} could not run: {message}")]
    Unavailable { operation: String, message: String },

    #[error("malformed {operation} response: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("clone of {repository} failed: {message}")]
    CloneFailed { repository: String, message: String },

    #[error("{step} failed in {repository}: {message}")]
    CommitFailed {
        repository: String,
        step: String,
        message: String,
    },

    #[error("not authenticated with {host}: {message}")]
    NotAuthenticated { host: String, message: String },
}

impl UserFacingError for RemoteError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated { .. } => Some("Run `gh auth login` and retry."),
            Self::Timeout { .. } => Some("The remote host did not answer in time; retry later."),
            Self::Unavailable { .. } => Some("Check that `gh` and `git` are installed and on PATH."),
            Self::CommitFailed { .. } => {
                Some("Inspect the scratch clone under temp_repos/ before retrying the push by hand.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Timeout { .. } => "remote.timeout",
            Self::CommandFailed { .. } => "remote.command_failed",
            Self::Unavailable { .. } => "remote.unavailable",
            Self::MalformedResponse { .. } => "remote.malformed_response",
            Self::CloneFailed { .. } => "remote.clone_failed",
            Self::CommitFailed { .. } => "remote.commit_failed",
            Self::NotAuthenticated { .. } => "remote.not_authenticated",
        })
    }
}
