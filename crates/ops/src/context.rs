//! Operations context for dependency injection

use safeprune_config::Config;
use safeprune_errors::{Error, OpsError};
use safeprune_events::{EventEmitter, EventSender};
use safeprune_health::ProbeEnv;
use safeprune_platform::{Platform, PlatformContext};
use safeprune_recovery::{BackupRestorer, RemotePublisher};
use safeprune_remote::{GhRemote, RemoteSourceControl};
use safeprune_verify::{Classifier, Oracle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Effective configuration
    pub config: Config,
    pub platform: Platform,
    /// Remote host access
    pub remote: Arc<dyn RemoteSourceControl>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    // Holds the clone cache, so it lives as long as the context
    publisher: RemotePublisher,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir()
    }

    /// Anchor a relative path at the working directory
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir().join(path)
        }
    }

    #[must_use]
    pub fn platform_context(&self) -> PlatformContext {
        self.platform.create_context(Some(self.tx.clone()))
    }

    #[must_use]
    pub fn oracle(&self) -> Oracle {
        Oracle::new(Arc::clone(&self.remote), self.config.remote.owner.clone())
            .with_timeout(self.config.remote.search_timeout())
    }

    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.oracle()).with_event_sender(self.tx.clone())
    }

    #[must_use]
    pub fn restorer(&self) -> BackupRestorer {
        BackupRestorer::from_config(
            &self.work_dir(),
            &self.config.backup,
            &self.platform,
            &self.platform_context(),
            &self.config.remote.git_program,
        )
        .with_event_sender(self.tx.clone())
    }

    #[must_use]
    pub fn publisher(&self) -> &RemotePublisher {
        &self.publisher
    }

    /// Inputs for the default health probes
    #[must_use]
    pub fn probe_env(&self) -> Arc<ProbeEnv> {
        Arc::new(ProbeEnv {
            work_dir: self.work_dir(),
            clone_dir: self.config.clone_dir(),
            remote_config: self.config.remote.clone(),
            health_config: self.config.health.clone(),
            platform: self.platform.clone(),
            context: self.platform_context(),
            remote: Arc::clone(&self.remote),
            oracle: self.oracle(),
            restorer: Arc::new(self.restorer()),
        })
    }
}

/// Builder for [`OpsCtx`]
///
/// The platform defaults to real child processes and the remote to the
/// `gh`/`git` backed [`GhRemote`].
#[derive(Default)]
pub struct OpsContextBuilder {
    config: Option<Config>,
    platform: Option<Platform>,
    remote: Option<Arc<dyn RemoteSourceControl>>,
    tx: Option<EventSender>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Use a specific remote instead of `gh`
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteSourceControl>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or event sender is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let platform = self.platform.unwrap_or_else(Platform::current);
        let work_dir = config.work_dir();

        let remote: Arc<dyn RemoteSourceControl> = match self.remote {
            Some(remote) => remote,
            None => {
                let context = platform.create_context(Some(tx.clone()));
                Arc::new(
                    GhRemote::new(platform.clone(), context, &work_dir)
                        .with_host(config.remote.host.clone())
                        .with_programs(
                            config.remote.gh_program.clone(),
                            config.remote.git_program.clone(),
                        ),
                )
            }
        };

        let publisher = RemotePublisher::new(
            Arc::clone(&remote),
            config.remote.owner.clone(),
            &work_dir,
            config.clone_dir(),
        )
        .with_cleanup_config(config.cleanup.clone())
        .with_event_sender(tx.clone());

        Ok(OpsCtx {
            config,
            platform,
            remote,
            tx,
            publisher,
        })
    }
}
