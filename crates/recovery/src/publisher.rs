//! Remote publisher
//!
//! Pushes a local file into a scratch clone of the target repository. Clones
//! live under the clone directory keyed by repository name and are reused
//! for the life of the publisher. A directory left by an earlier run is reused
//! only when it is a git checkout.

use safeprune_config::CleanupConfig;
use safeprune_errors::{Error, RemoteError, UserFacingError};
use safeprune_events::{AppEvent, EventEmitter, EventSender, FailureContext, RecoveryEvent};
use safeprune_platform::fs;
use safeprune_remote::RemoteSourceControl;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of a publish attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub file: String,
    pub repository: String,
    pub published: bool,
    /// Step that failed: `clone`, `copy`, `add`, `commit` or `push`
    pub failed_step: Option<String>,
    pub reason: Option<String>,
}

struct StepFailure {
    step: String,
    error: Error,
}

impl StepFailure {
    fn new(step: &str, error: impl Into<Error>) -> Self {
        Self {
            step: step.to_string(),
            error: error.into(),
        }
    }
}

pub struct RemotePublisher {
    remote: Arc<dyn RemoteSourceControl>,
    owner: String,
    work_dir: PathBuf,
    clone_dir: PathBuf,
    cleanup: CleanupConfig,
    clones: Mutex<HashMap<String, PathBuf>>,
    event_sender: Option<EventSender>,
}

impl EventEmitter for RemotePublisher {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl RemotePublisher {
    #[must_use]
    pub fn new(
        remote: Arc<dyn RemoteSourceControl>,
        owner: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        clone_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            remote,
            owner: owner.into(),
            work_dir: work_dir.into(),
            clone_dir: clone_dir.into(),
            cleanup: CleanupConfig::default(),
            clones: Mutex::new(HashMap::new()),
            event_sender: None,
        }
    }

    /// Use the configured commit message template
    #[must_use]
    pub fn with_cleanup_config(mut self, cleanup: CleanupConfig) -> Self {
        self.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn clone_dir(&self) -> &Path {
        &self.clone_dir
    }

    /// Publish `file` (relative to the working directory) into `repository`.
    ///
    /// The first failing step ends the attempt. Nothing is retried.
    pub async fn publish(&self, file: &str, repository: &str) -> PublishOutcome {
        match self.try_publish(file, repository).await {
            Ok(()) => {
                self.emit(AppEvent::Recovery(RecoveryEvent::Published {
                    file: file.to_string(),
                    repository: repository.to_string(),
                }));
                PublishOutcome {
                    file: file.to_string(),
                    repository: repository.to_string(),
                    published: true,
                    failed_step: None,
                    reason: None,
                }
            }
            Err(failure) => {
                let reason = failure.error.user_message().into_owned();
                self.emit(AppEvent::Recovery(RecoveryEvent::PublishFailed {
                    file: file.to_string(),
                    repository: repository.to_string(),
                    step: failure.step.clone(),
                    failure: FailureContext::from_error(&failure.error),
                }));
                PublishOutcome {
                    file: file.to_string(),
                    repository: repository.to_string(),
                    published: false,
                    failed_step: Some(failure.step),
                    reason: Some(reason),
                }
            }
        }
    }

    async fn try_publish(&self, file: &str, repository: &str) -> Result<(), StepFailure> {
        let clone = self
            .ensure_clone(file, repository)
            .await
            .map_err(|e| StepFailure::new("clone", e))?;

        self.step(file, repository, "copy");
        fs::copy_file(&self.work_dir.join(file), &clone.join(file))
            .await
            .map_err(|e| StepFailure::new("copy", e))?;

        self.step(file, repository, "commit");
        let message = self.cleanup.commit_message_for(file);
        self.remote
            .commit_and_push(&clone, file, &message)
            .await
            .map_err(|e| {
                let step = match &e {
                    RemoteError::CommitFailed { step, .. } => step.clone(),
                    _ => "commit".to_string(),
                };
                StepFailure {
                    step,
                    error: e.into(),
                }
            })
    }

    fn step(&self, file: &str, repository: &str, step: &str) {
        self.emit(AppEvent::Recovery(RecoveryEvent::PublishStep {
            file: file.to_string(),
            repository: repository.to_string(),
            step: step.to_string(),
        }));
    }

    /// Path of a usable clone of `repository`, cloning on first use
    async fn ensure_clone(&self, file: &str, repository: &str) -> Result<PathBuf, RemoteError> {
        let mut clones = self.clones.lock().await;
        if let Some(path) = clones.get(repository) {
            self.emit(AppEvent::Recovery(RecoveryEvent::CloneReused {
                file: file.to_string(),
                repository: repository.to_string(),
                path: path.display().to_string(),
            }));
            return Ok(path.clone());
        }

        let destination = self.clone_dir.join(repository);
        if fs::is_dir(&destination.join(".git")).await {
            self.emit(AppEvent::Recovery(RecoveryEvent::CloneReused {
                file: file.to_string(),
                repository: repository.to_string(),
                path: destination.display().to_string(),
            }));
        } else if fs::dir_non_empty(&destination).await {
            // git would walk up to an enclosing repository and push there
            return Err(RemoteError::CloneFailed {
                repository: repository.to_string(),
                message: format!(
                    "{} exists but is not a git checkout; remove it and retry",
                    destination.display()
                ),
            });
        } else {
            self.emit(AppEvent::Recovery(RecoveryEvent::CloneStarted {
                file: file.to_string(),
                repository: repository.to_string(),
                destination: destination.display().to_string(),
            }));
            fs::create_dir_all(&self.clone_dir)
                .await
                .map_err(|e| RemoteError::CloneFailed {
                    repository: repository.to_string(),
                    message: e.to_string(),
                })?;
            self.remote
                .clone_repository(&self.owner, repository, &destination)
                .await?;
        }

        clones.insert(repository.to_string(), destination.clone());
        Ok(destination)
    }
}
