//! Scriptable in-process remote
//!
//! Holds repositories as name -> file lists and lets callers inject failures
//! per query. Clones materialize the repository's files on disk so the
//! publish path can run against a real directory.

use async_trait::async_trait;
use safeprune_errors::RemoteError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::RemoteSourceControl;

/// A failure to return instead of a real answer
#[derive(Debug, Clone)]
pub enum ScriptedFailure {
    Timeout,
    /// Non-zero exit carrying this stderr
    Failed(String),
    /// Unparseable payload with this detail
    Malformed(String),
    /// The tool could not be started
    Unavailable(String),
}

impl ScriptedFailure {
    fn into_error(self, operation: &str, timeout: Duration) -> RemoteError {
        let operation = operation.to_string();
        match self {
            Self::Timeout => RemoteError::Timeout {
                operation,
                timeout_secs: timeout.as_secs(),
            },
            Self::Failed(stderr) => RemoteError::CommandFailed { operation, stderr },
            Self::Malformed(message) => RemoteError::MalformedResponse { operation, message },
            Self::Unavailable(message) => RemoteError::Unavailable { operation, message },
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// Insertion-ordered repositories and their top-level files
    repositories: Vec<(String, Vec<String>)>,
    search_failures: HashMap<String, ScriptedFailure>,
    search_delay: Option<Duration>,
    list_failure: Option<ScriptedFailure>,
    authenticated: bool,
    clone_failure: Option<String>,
    /// `(step, message)` for the next `commit_and_push`
    commit_failure: Option<(String, String)>,
    searches: Vec<String>,
    clones: Vec<(String, PathBuf)>,
    pushes: Vec<(PathBuf, String, String)>,
}

/// In-memory [`RemoteSourceControl`]
#[derive(Debug)]
pub struct InMemoryRemote {
    state: Mutex<State>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    /// An authenticated remote with no repositories
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                authenticated: true,
                ..State::default()
            }),
        }
    }

    /// Add a repository holding `files`
    #[must_use]
    pub fn with_repository<I, S>(mut self, name: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .get_mut()
            .repositories
            .push((name.to_string(), files.into_iter().map(Into::into).collect()));
        self
    }

    /// Fail every search for `filename`
    pub async fn fail_search(&self, filename: &str, failure: ScriptedFailure) {
        self.state
            .lock()
            .await
            .search_failures
            .insert(filename.to_string(), failure);
    }

    /// Sleep this long inside every search before answering
    pub async fn set_search_delay(&self, delay: Duration) {
        self.state.lock().await.search_delay = Some(delay);
    }

    /// Fail repository and contents listings
    pub async fn fail_listing(&self, failure: ScriptedFailure) {
        self.state.lock().await.list_failure = Some(failure);
    }

    pub async fn set_authenticated(&self, authenticated: bool) {
        self.state.lock().await.authenticated = authenticated;
    }

    /// Fail every clone with `message`
    pub async fn fail_clone(&self, message: impl Into<String>) {
        self.state.lock().await.clone_failure = Some(message.into());
    }

    /// Fail the next `commit_and_push` at `step` (`add`, `commit` or `push`)
    pub async fn fail_commit_step(&self, step: impl Into<String>, message: impl Into<String>) {
        self.state.lock().await.commit_failure = Some((step.into(), message.into()));
    }

    /// File names searched so far, in order
    pub async fn searches(&self) -> Vec<String> {
        self.state.lock().await.searches.clone()
    }

    /// Number of clones performed
    pub async fn clone_count(&self) -> usize {
        self.state.lock().await.clones.len()
    }

    /// `(repo_path, filename, message)` for every successful push
    pub async fn pushes(&self) -> Vec<(PathBuf, String, String)> {
        self.state.lock().await.pushes.clone()
    }
}

#[async_trait]
impl RemoteSourceControl for InMemoryRemote {
    async fn search_code(
        &self,
        filename: &str,
        _owner: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let delay = {
            let mut state = self.state.lock().await;
            state.searches.push(filename.to_string());
            state.search_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().await;
        if let Some(failure) = state.search_failures.get(filename) {
            return Err(failure.clone().into_error("search", timeout));
        }

        Ok(state
            .repositories
            .iter()
            .filter(|(_, files)| files.iter().any(|f| f == filename))
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn list_contents(
        &self,
        _owner: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let state = self.state.lock().await;
        if let Some(failure) = &state.list_failure {
            return Err(failure.clone().into_error("list contents", timeout));
        }

        state
            .repositories
            .iter()
            .find(|(name, _)| name == repo)
            .map(|(_, files)| files.clone())
            .ok_or_else(|| RemoteError::CommandFailed {
                operation: "list contents".to_string(),
                stderr: format!("HTTP 404: Not Found (repos/{repo}/contents)"),
            })
    }

    async fn list_repositories(
        &self,
        _owner: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let state = self.state.lock().await;
        if let Some(failure) = &state.list_failure {
            return Err(failure.clone().into_error("list repositories", timeout));
        }

        Ok(state
            .repositories
            .iter()
            .take(limit)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn auth_status(&self, _timeout: Duration) -> Result<(), RemoteError> {
        if self.state.lock().await.authenticated {
            Ok(())
        } else {
            Err(RemoteError::NotAuthenticated {
                host: "github.com".to_string(),
                message: "You are not logged into any GitHub hosts".to_string(),
            })
        }
    }

    async fn clone_repository(
        &self,
        _owner: &str,
        repo: &str,
        destination: &Path,
    ) -> Result<(), RemoteError> {
        let files = {
            let state = self.state.lock().await;
            if let Some(message) = &state.clone_failure {
                return Err(RemoteError::CloneFailed {
                    repository: repo.to_string(),
                    message: message.clone(),
                });
            }
            state
                .repositories
                .iter()
                .find(|(name, _)| name == repo)
                .map(|(_, files)| files.clone())
                .ok_or_else(|| RemoteError::CloneFailed {
                    repository: repo.to_string(),
                    message: format!("repository {repo} not found"),
                })?
        };

        let clone_failed = |e: std::io::Error| RemoteError::CloneFailed {
            repository: repo.to_string(),
            message: e.to_string(),
        };
        tokio::fs::create_dir_all(destination.join(".git"))
            .await
            .map_err(clone_failed)?;
        for file in &files {
            tokio::fs::write(destination.join(file), b"").await.map_err(clone_failed)?;
        }

        self.state
            .lock()
            .await
            .clones
            .push((repo.to_string(), destination.to_path_buf()));
        Ok(())
    }

    async fn commit_and_push(
        &self,
        repo_path: &Path,
        filename: &str,
        message: &str,
    ) -> Result<(), RemoteError> {
        let repository = repo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut state = self.state.lock().await;
        if let Some((step, reason)) = state.commit_failure.take() {
            return Err(RemoteError::CommitFailed {
                repository,
                step,
                message: reason,
            });
        }

        if !tokio::fs::try_exists(repo_path.join(filename)).await.unwrap_or(false) {
            return Err(RemoteError::CommitFailed {
                repository,
                step: "add".to_string(),
                message: format!("pathspec '{filename}' did not match any files"),
            });
        }

        if let Some((_, files)) = state.repositories.iter_mut().find(|(name, _)| *name == repository) {
            if !files.iter().any(|f| f == filename) {
                files.push(filename.to_string());
            }
        }
        state
            .pushes
            .push((repo_path.to_path_buf(), filename.to_string(), message.to_string()));
        Ok(())
    }
}
