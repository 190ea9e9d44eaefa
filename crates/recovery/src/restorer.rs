//! Backup restorer

use safeprune_config::BackupConfig;
use safeprune_errors::UserFacingError;
use safeprune_events::{AppEvent, EventEmitter, EventSender, RecoveryEvent};
use safeprune_platform::{fs, Platform, PlatformContext};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::sources::{DirectorySource, Retrievable, VcsObjectSource};

/// Result of a restore attempt. Finding nothing is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub file: String,
    pub restored: bool,
    /// Label of the source that supplied the file
    pub source: Option<String>,
    pub destination: PathBuf,
}

/// Scans backup sources in priority order and restores the first hit
pub struct BackupRestorer {
    work_dir: PathBuf,
    sources: Vec<Box<dyn Retrievable>>,
    event_sender: Option<EventSender>,
}

impl EventEmitter for BackupRestorer {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl BackupRestorer {
    /// A restorer with no sources
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            sources: Vec::new(),
            event_sender: None,
        }
    }

    /// Standard source list: each configured directory under `work_dir`, with
    /// git object storage inserted at `vcs_position` when enabled.
    #[must_use]
    pub fn from_config(
        work_dir: &Path,
        config: &BackupConfig,
        platform: &Platform,
        context: &PlatformContext,
        git_program: &str,
    ) -> Self {
        let mut sources: Vec<Box<dyn Retrievable>> = config
            .locations
            .iter()
            .map(|name| Box::new(DirectorySource::under(work_dir, name)) as Box<dyn Retrievable>)
            .collect();

        if config.use_vcs_objects {
            let vcs = VcsObjectSource::new(platform.clone(), context.clone(), work_dir)
                .with_git_program(git_program);
            let at = config.vcs_position.min(sources.len());
            sources.insert(at, Box::new(vcs));
        }

        Self {
            work_dir: work_dir.to_path_buf(),
            sources,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Retrievable + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Labels of the configured sources, in priority order
    #[must_use]
    pub fn source_labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// True when at least one source is configured and none is misconfigured
    pub async fn sources_usable(&self) -> bool {
        if self.sources.is_empty() {
            return false;
        }
        for source in &self.sources {
            if !source.is_usable().await {
                tracing::debug!(source = %source.label(), "backup source unusable");
                return false;
            }
        }
        true
    }

    /// Restore `file` into the working directory from the first source that
    /// has it.
    ///
    /// Each fetch goes to a staging path beside the destination and is renamed
    /// into place only when complete, so a failed fetch never leaves a partial
    /// file behind.
    pub async fn restore(&self, file: &str) -> RestoreOutcome {
        let destination = self.work_dir.join(file);
        self.emit(AppEvent::Recovery(RecoveryEvent::RestoreStarted {
            file: file.to_string(),
            sources: self.sources.len(),
        }));

        for source in &self.sources {
            let label = source.label();
            if !source.contains(file).await {
                tracing::debug!(file, source = %label, "not present");
                continue;
            }

            match self.fetch_into_place(source.as_ref(), file, &destination).await {
                Ok(()) => {
                    self.emit(AppEvent::Recovery(RecoveryEvent::Restored {
                        file: file.to_string(),
                        source: label.clone(),
                    }));
                    return RestoreOutcome {
                        file: file.to_string(),
                        restored: true,
                        source: Some(label),
                        destination,
                    };
                }
                Err(e) => {
                    self.emit(AppEvent::Recovery(RecoveryEvent::SourceSkipped {
                        file: file.to_string(),
                        source: label,
                        reason: e.user_message().into_owned(),
                    }));
                }
            }
        }

        self.emit(AppEvent::Recovery(RecoveryEvent::RestoreFailed {
            file: file.to_string(),
        }));
        RestoreOutcome {
            file: file.to_string(),
            restored: false,
            source: None,
            destination,
        }
    }

    async fn fetch_into_place(
        &self,
        source: &dyn Retrievable,
        file: &str,
        destination: &Path,
    ) -> Result<(), safeprune_errors::Error> {
        let staging = staging_path(destination);
        let result = async {
            source.fetch(file, &staging).await?;
            tokio::fs::rename(&staging, destination)
                .await
                .map_err(|e| safeprune_errors::Error::io_with_path(&e, destination))
        }
        .await;

        if result.is_err() {
            if let Err(cleanup) = fs::remove_file_if_exists(&staging).await {
                tracing::warn!(path = %staging.display(), error = %cleanup, "partial restore left behind");
            }
        }
        result
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".safeprune-partial");
    destination.with_file_name(name)
}
