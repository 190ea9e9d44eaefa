//! `gh` / `git` backed remote
//!
//! Every invocation carries an explicit working directory and, for queries, a
//! bounded wait enforced by the platform layer.

use async_trait::async_trait;
use safeprune_errors::{Error, PlatformError, RemoteError};
use safeprune_platform::{CommandOutput, Platform, PlatformCommand, PlatformContext};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::parse;
use crate::RemoteSourceControl;

/// Remote source control driven through the GitHub CLI and git
#[derive(Clone)]
pub struct GhRemote {
    platform: Platform,
    context: PlatformContext,
    work_dir: PathBuf,
    host: String,
    gh_program: String,
    git_program: String,
}

impl GhRemote {
    /// Create a remote that runs `gh` and `git` from `work_dir`
    #[must_use]
    pub fn new(platform: Platform, context: PlatformContext, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            context,
            work_dir: work_dir.into(),
            host: "github.com".to_string(),
            gh_program: "gh".to_string(),
            git_program: "git".to_string(),
        }
    }

    /// Override the program names (or absolute paths) used for `gh` and `git`
    #[must_use]
    pub fn with_programs(mut self, gh: impl Into<String>, git: impl Into<String>) -> Self {
        self.gh_program = gh.into();
        self.git_program = git.into();
        self
    }

    /// Host named in authentication errors
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn gh(&self) -> PlatformCommand {
        let mut cmd = self.platform.command(&self.gh_program);
        cmd.current_dir(&self.work_dir);
        cmd
    }

    fn git(&self, repo_path: &Path) -> PlatformCommand {
        let mut cmd = self.platform.command(&self.git_program);
        cmd.current_dir(repo_path);
        cmd
    }

    async fn run(&self, operation: &str, cmd: PlatformCommand) -> Result<CommandOutput, RemoteError> {
        self.platform
            .execute_command(&self.context, cmd)
            .await
            .map_err(|e| remote_error(operation, e))
    }

    /// Run a command and require a zero exit status
    async fn run_checked(
        &self,
        operation: &str,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, RemoteError> {
        let output = self.run(operation, cmd).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(RemoteError::CommandFailed {
                operation: operation.to_string(),
                stderr: output.stderr_trimmed(),
            })
        }
    }
}

fn remote_error(operation: &str, err: Error) -> RemoteError {
    match err {
        Error::Platform(PlatformError::ProcessTimedOut { timeout_secs, .. }) => {
            RemoteError::Timeout {
                operation: operation.to_string(),
                timeout_secs,
            }
        }
        other => RemoteError::Unavailable {
            operation: operation.to_string(),
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl RemoteSourceControl for GhRemote {
    async fn search_code(
        &self,
        filename: &str,
        owner: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let mut cmd = self.gh();
        cmd.args(["search", "code"])
            .arg(format!("filename:{filename}"))
            .args(["--owner", owner, "--json", "repository"])
            .timeout(timeout);

        let output = self.run_checked("search", cmd).await?;
        parse::parse_search_response(&output.stdout_lossy()).map_err(|message| {
            RemoteError::MalformedResponse {
                operation: "search".to_string(),
                message,
            }
        })
    }

    async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let mut cmd = self.gh();
        cmd.arg("api")
            .arg(format!("repos/{owner}/{repo}/contents"))
            .args(["--jq", ".[].name"])
            .timeout(timeout);

        let output = self.run_checked("list contents", cmd).await?;
        Ok(parse::parse_lines(&output.stdout_lossy()))
    }

    async fn list_repositories(
        &self,
        owner: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError> {
        let mut cmd = self.gh();
        cmd.args(["repo", "list", owner, "--limit"])
            .arg(limit.to_string())
            .args(["--json", "name"])
            .timeout(timeout);

        let output = self.run_checked("list repositories", cmd).await?;
        parse::parse_repository_list(&output.stdout_lossy()).map_err(|message| {
            RemoteError::MalformedResponse {
                operation: "list repositories".to_string(),
                message,
            }
        })
    }

    async fn auth_status(&self, timeout: Duration) -> Result<(), RemoteError> {
        let mut cmd = self.gh();
        cmd.args(["auth", "status", "--hostname", self.host.as_str()])
            .timeout(timeout);

        let output = self.run("auth status", cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(RemoteError::NotAuthenticated {
                host: self.host.clone(),
                message: output.stderr_trimmed(),
            })
        }
    }

    async fn clone_repository(
        &self,
        owner: &str,
        repo: &str,
        destination: &Path,
    ) -> Result<(), RemoteError> {
        let mut cmd = self.gh();
        cmd.args(["repo", "clone"])
            .arg(format!("{owner}/{repo}"))
            .arg(destination.to_string_lossy());

        let output = self
            .run("clone", cmd)
            .await
            .map_err(|e| RemoteError::CloneFailed {
                repository: repo.to_string(),
                message: e.to_string(),
            })?;

        if output.success() {
            Ok(())
        } else {
            Err(RemoteError::CloneFailed {
                repository: repo.to_string(),
                message: output.stderr_trimmed(),
            })
        }
    }

    async fn commit_and_push(
        &self,
        repo_path: &Path,
        filename: &str,
        message: &str,
    ) -> Result<(), RemoteError> {
        let repository = repo_path
            .file_name()
            .map_or_else(|| repo_path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mut add = self.git(repo_path);
        add.args(["add", "--", filename]);
        let mut commit = self.git(repo_path);
        commit.args(["commit", "-m", message]);
        let mut push = self.git(repo_path);
        push.arg("push");

        for (step, cmd) in [("add", add), ("commit", commit), ("push", push)] {
            tracing::debug!(repository = %repository, step, "git step");
            let output = self.run(step, cmd).await.map_err(|e| RemoteError::CommitFailed {
                repository: repository.clone(),
                step: step.to_string(),
                message: e.to_string(),
            })?;

            if !output.success() {
                let stderr = output.stderr_trimmed();
                let message = if stderr.is_empty() {
                    output.stdout_lossy().trim().to_string()
                } else {
                    stderr
                };
                return Err(RemoteError::CommitFailed {
                    repository,
                    step: step.to_string(),
                    message,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_remote_timeout() {
        let err = remote_error(
            "search",
            PlatformError::ProcessTimedOut {
                command: "gh search code".to_string(),
                timeout_secs: 30,
            }
            .into(),
        );
        assert!(matches!(err, RemoteError::Timeout { timeout_secs: 30, .. }));
        assert_eq!(err.to_string(), "search timed out after 30s");
    }

    #[test]
    fn test_spawn_failure_maps_to_unavailable() {
        let err = remote_error(
            "search",
            PlatformError::CommandNotFound {
                command: "gh".to_string(),
            }
            .into(),
        );
        assert!(matches!(err, RemoteError::Unavailable { .. }));
    }
}
