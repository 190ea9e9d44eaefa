//! Backup sources

use async_trait::async_trait;
use safeprune_errors::{Error, PlatformError};
use safeprune_platform::{fs, Platform, PlatformContext};
use std::path::{Path, PathBuf};

/// A place a backup copy of a file might live
#[async_trait]
pub trait Retrievable: Send + Sync {
    /// Short label used in events and outcomes
    fn label(&self) -> String;

    /// Whether this source claims to hold `file`
    async fn contains(&self, file: &str) -> bool;

    /// Write this source's copy of `file` to `destination`
    async fn fetch(&self, file: &str, destination: &Path) -> Result<(), Error>;

    /// Whether the source is set up sanely (missing is fine, wrong kind is not)
    async fn is_usable(&self) -> bool {
        true
    }
}

/// Backup copies kept under a directory, mirroring the working tree layout
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    label: String,
}

impl DirectorySource {
    /// `root` holds `<root>/<file>`; `label` names it in reports
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            label: label.into(),
        }
    }

    /// Source for `work_dir/<name>/`
    #[must_use]
    pub fn under(work_dir: &Path, name: &str) -> Self {
        Self::new(work_dir.join(name), format!("{name}/"))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Retrievable for DirectorySource {
    fn label(&self) -> String {
        self.label.clone()
    }

    async fn contains(&self, file: &str) -> bool {
        fs::is_file(&self.root.join(file)).await
    }

    async fn fetch(&self, file: &str, destination: &Path) -> Result<(), Error> {
        fs::copy_file(&self.root.join(file), destination).await?;
        Ok(())
    }

    async fn is_usable(&self) -> bool {
        !fs::exists(&self.root).await || fs::is_dir(&self.root).await
    }
}

/// Committed content from git object storage (`git show <rev>:<file>`)
#[derive(Clone)]
pub struct VcsObjectSource {
    platform: Platform,
    context: PlatformContext,
    work_dir: PathBuf,
    git_program: String,
    revision: String,
}

impl VcsObjectSource {
    #[must_use]
    pub fn new(platform: Platform, context: PlatformContext, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            context,
            work_dir: work_dir.into(),
            git_program: "git".to_string(),
            revision: "HEAD".to_string(),
        }
    }

    #[must_use]
    pub fn with_git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }

    fn object(&self, file: &str) -> String {
        format!("{}:{file}", self.revision)
    }
}

#[async_trait]
impl Retrievable for VcsObjectSource {
    fn label(&self) -> String {
        format!("git {}", self.revision)
    }

    async fn contains(&self, file: &str) -> bool {
        let mut cmd = self.platform.command(&self.git_program);
        cmd.current_dir(&self.work_dir)
            .args(["cat-file", "-e"])
            .arg(self.object(file));

        match self.platform.execute_command(&self.context, cmd).await {
            Ok(output) => output.success(),
            Err(e) => {
                tracing::debug!(error = %e, "git unavailable for backup lookup");
                false
            }
        }
    }

    async fn fetch(&self, file: &str, destination: &Path) -> Result<(), Error> {
        let mut cmd = self.platform.command(&self.git_program);
        cmd.current_dir(&self.work_dir)
            .arg("show")
            .arg(self.object(file));

        let output = self.platform.execute_command(&self.context, cmd).await?;
        if !output.success() {
            return Err(PlatformError::ProcessExecutionFailed {
                command: format!("git show {}", self.object(file)),
                message: output.stderr_trimmed(),
            }
            .into());
        }

        fs::write(destination, &output.stdout).await
    }
}
