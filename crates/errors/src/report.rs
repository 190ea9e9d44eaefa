//! Report artifact errors
//!
//! These are kept apart from remote errors: failing to determine whether a
//! file is safe is recoverable, failing to record the determination is not.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ReportError {
    #[error("failed to serialize {artifact}: {message}")]
    SerializeFailed { artifact: String, message: String },

    #[error("failed to write {artifact} to {path}: {message}")]
    WriteFailed {
        artifact: String,
        path: String,
        message: String,
    },
}

impl UserFacingError for ReportError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::WriteFailed { .. } => {
                Some("The verification ran but its report could not be saved; check the report path is writable.")
            }
            Self::SerializeFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::SerializeFailed { .. } => "report.serialize_failed",
            Self::WriteFailed { .. } => "report.write_failed",
        })
    }
}
