use serde::{Deserialize, Serialize};

/// Events emitted while verifying candidate files against the remote host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerificationEvent {
    Started {
        total: usize,
        owner: String,
    },

    /// A single remote existence query is about to run
    FileQueried {
        file: String,
    },

    /// The remote answered but its payload could not be parsed.
    ///
    /// Still classified as unsafe; reported separately so a broken search
    /// tool is distinguishable from a genuinely absent file.
    MalformedResponse {
        file: String,
        message: String,
    },

    FileClassified {
        file: String,
        safe: bool,
        reason: String,
    },

    Completed {
        total: usize,
        safe: usize,
        unsafe_count: usize,
    },

    ReportWritten {
        path: String,
    },
}

impl VerificationEvent {
    /// File this event refers to, if it is per-file
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::FileQueried { file }
            | Self::MalformedResponse { file, .. }
            | Self::FileClassified { file, .. } => Some(file),
            Self::Started { .. } | Self::Completed { .. } | Self::ReportWritten { .. } => None,
        }
    }
}
