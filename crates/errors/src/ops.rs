//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("no files specified")]
    NoFilesSpecified,

    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("invalid file name {name}: {reason}")]
    InvalidFileName { name: String, reason: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoFilesSpecified => {
                Some("Pass file names on the command line or set cleanup.candidates in the config.")
            }
            Self::InvalidFileName { .. } => {
                Some("Use a path relative to the working directory without '..' components.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoFilesSpecified => "ops.no_files",
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::InvalidFileName { .. } => "ops.invalid_file_name",
            Self::SerializationError { .. } => "ops.serialization",
        })
    }
}
