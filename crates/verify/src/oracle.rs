//! Remote existence oracle

use safeprune_errors::RemoteError;
use safeprune_remote::RemoteSourceControl;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a query produced no usable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    CommandFailed,
    Malformed,
    Other,
}

/// Outcome of asking the remote whether a file exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "answer", rename_all = "snake_case")]
pub enum OracleAnswer {
    Found { repositories: Vec<String> },
    NotFound,
    Failed { kind: FailureKind, detail: String },
}

impl OracleAnswer {
    /// Only a positive answer proves existence
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Found { repositories } => {
                format!("Found in repositories: {}", repositories.join(", "))
            }
            Self::NotFound => "File not found in any GitHub repository".to_string(),
            Self::Failed { kind, detail } => match kind {
                FailureKind::Timeout => "Search timed out".to_string(),
                FailureKind::CommandFailed => format!("Search failed: {detail}"),
                FailureKind::Malformed => format!("Malformed search response: {detail}"),
                FailureKind::Other => format!("Error searching: {detail}"),
            },
        }
    }

    fn from_error(err: RemoteError) -> Self {
        let (kind, detail) = match err {
            RemoteError::Timeout { .. } => (FailureKind::Timeout, err.to_string()),
            RemoteError::CommandFailed { stderr, .. } => (FailureKind::CommandFailed, stderr),
            RemoteError::MalformedResponse { message, .. } => (FailureKind::Malformed, message),
            other => (FailureKind::Other, other.to_string()),
        };
        Self::Failed { kind, detail }
    }
}

/// Answers "does this file exist in any repository of the owner?"
#[derive(Clone)]
pub struct Oracle {
    remote: Arc<dyn RemoteSourceControl>,
    owner: String,
    timeout: Duration,
}

impl Oracle {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteSourceControl>, owner: impl Into<String>) -> Self {
        Self {
            remote,
            owner: owner.into(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query the remote for `filename`.
    ///
    /// Never errors: every failure becomes [`OracleAnswer::Failed`]. The wait
    /// is bounded here as well as in the remote, so a remote that ignores its
    /// timeout still cannot stall classification.
    pub async fn query(&self, filename: &str) -> OracleAnswer {
        let search = self.remote.search_code(filename, &self.owner, self.timeout);
        match tokio::time::timeout(self.timeout, search).await {
            Ok(Ok(repositories)) if repositories.is_empty() => OracleAnswer::NotFound,
            Ok(Ok(repositories)) => OracleAnswer::Found { repositories },
            Ok(Err(err)) => OracleAnswer::from_error(err),
            Err(_) => OracleAnswer::Failed {
                kind: FailureKind::Timeout,
                detail: format!("search timed out after {}s", self.timeout.as_secs()),
            },
        }
    }
}
