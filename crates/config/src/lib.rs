#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for safeprune
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/safeprune/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use serde::{Deserialize, Serialize};
use safeprune_errors::{ConfigError, Error};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub health: HealthConfig,
}

/// Output format for CLI results. `plain` is the table layout without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tty,
    Plain,
    Json,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub default_output: OutputFormat,
    #[serde(default)]
    pub color: ColorChoice,
}

/// Remote host access: who to ask and how long to wait
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Organization (or user) owning the repositories searched
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_gh_program")]
    pub gh_program: String,
    #[serde(default = "default_git_program")]
    pub git_program: String,
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
    #[serde(default = "default_contents_timeout")]
    pub contents_timeout_secs: u64,
    #[serde(default = "default_connectivity_timeout")]
    pub connectivity_timeout_secs: u64,
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,
    #[serde(default = "default_repository_probe_limit")]
    pub repository_probe_limit: usize,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub work_dir: Option<PathBuf>,
    pub clone_dir: Option<PathBuf>,
    pub cleanup_report: Option<PathBuf>,
    pub health_report: Option<PathBuf>,
}

/// Backup source layout, searched in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directories (relative to the working directory) holding backup copies
    #[serde(default = "default_backup_locations")]
    pub locations: Vec<String>,
    /// Also look in version-control object storage (`git show HEAD:<file>`)
    #[serde(default = "default_use_vcs_objects")]
    pub use_vcs_objects: bool,
    /// Position of the version-control source within `locations`
    #[serde(default = "default_vcs_position")]
    pub vcs_position: usize,
}

/// Cleanup workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Files verified when `verify` is called without arguments
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

/// Health check suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Files that must exist in the working directory
    #[serde(default)]
    pub essential_files: Vec<String>,
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,
    /// File the oracle capability probe asks about
    #[serde(default = "default_oracle_probe_file")]
    pub oracle_probe_file: String,
}

// Default implementations

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            host: default_host(),
            gh_program: default_gh_program(),
            git_program: default_git_program(),
            search_timeout_secs: default_search_timeout(),
            list_timeout_secs: default_list_timeout(),
            contents_timeout_secs: default_contents_timeout(),
            connectivity_timeout_secs: default_connectivity_timeout(),
            auth_timeout_secs: default_auth_timeout(),
            repository_probe_limit: default_repository_probe_limit(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            locations: default_backup_locations(),
            use_vcs_objects: default_use_vcs_objects(),
            vcs_position: default_vcs_position(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            commit_message: default_commit_message(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            essential_files: Vec::new(),
            rules_dir: default_rules_dir(),
            oracle_probe_file: default_oracle_probe_file(),
        }
    }
}

// Default value functions for serde
fn default_owner() -> String {
    constants::DEFAULT_OWNER.to_string()
}

fn default_host() -> String {
    constants::DEFAULT_HOST.to_string()
}

fn default_gh_program() -> String {
    "gh".to_string()
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_search_timeout() -> u64 {
    30
}

fn default_list_timeout() -> u64 {
    30
}

fn default_contents_timeout() -> u64 {
    15
}

fn default_connectivity_timeout() -> u64 {
    5
}

fn default_auth_timeout() -> u64 {
    10
}

fn default_repository_probe_limit() -> usize {
    10
}

fn default_backup_locations() -> Vec<String> {
    ["backups", "backup", "__pycache__", "temp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_use_vcs_objects() -> bool {
    true
}

fn default_vcs_position() -> usize {
    2 // after backups/ and backup/
}

fn default_commit_message() -> String {
    constants::DEFAULT_COMMIT_MESSAGE.to_string()
}

fn default_rules_dir() -> String {
    ".cursor/rules".to_string()
}

fn default_oracle_probe_file() -> String {
    "README.md".to_string()
}

impl RemoteConfig {
    #[must_use]
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    #[must_use]
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    #[must_use]
    pub fn contents_timeout(&self) -> Duration {
        Duration::from_secs(self.contents_timeout_secs)
    }

    #[must_use]
    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }

    #[must_use]
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }
}

impl CleanupConfig {
    /// Commit message for publishing `file`
    #[must_use]
    pub fn commit_message_for(&self, file: &str) -> String {
        self.commit_message.replace("{file}", file)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("safeprune").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(owner) = std::env::var("SAFEPRUNE_ORG") {
            if owner.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "SAFEPRUNE_ORG".to_string(),
                    value: owner,
                }
                .into());
            }
            self.remote.owner = owner;
        }

        if let Ok(dir) = std::env::var("SAFEPRUNE_WORK_DIR") {
            self.paths.work_dir = Some(PathBuf::from(dir));
        }

        if let Ok(timeout) = std::env::var("SAFEPRUNE_SEARCH_TIMEOUT") {
            self.remote.search_timeout_secs =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "SAFEPRUNE_SEARCH_TIMEOUT".to_string(),
                    value: timeout,
                })?;
        }

        if let Ok(output) = std::env::var("SAFEPRUNE_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SAFEPRUNE_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        if let Ok(color) = std::env::var("SAFEPRUNE_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SAFEPRUNE_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Get the working directory (with default: process cwd)
    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.paths
            .work_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Scratch directory for repository clones
    #[must_use]
    pub fn clone_dir(&self) -> PathBuf {
        self.resolve(self.paths.clone_dir.as_deref(), constants::CLONE_DIR)
    }

    /// Location of the classification report artifact
    #[must_use]
    pub fn cleanup_report_path(&self) -> PathBuf {
        self.resolve(
            self.paths.cleanup_report.as_deref(),
            constants::CLEANUP_REPORT_FILE,
        )
    }

    /// Location of the health suite report artifact
    #[must_use]
    pub fn health_report_path(&self) -> PathBuf {
        self.resolve(
            self.paths.health_report.as_deref(),
            constants::HEALTH_REPORT_FILE,
        )
    }

    // Relative overrides are anchored at the working directory
    fn resolve(&self, configured: Option<&Path>, default: &str) -> PathBuf {
        match configured {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.work_dir().join(path),
            None => self.work_dir().join(default),
        }
    }
}
