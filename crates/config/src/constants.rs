//! Fixed artifact names and defaults
//!
//! Artifact names are part of the operator-facing contract (other tooling
//! reads them), so they are not configurable beyond their directory.

/// Classification report written by every `verify` run.
pub const CLEANUP_REPORT_FILE: &str = "cleanup_verification_log.json";

/// Health suite report written by every `check-health` run.
pub const HEALTH_REPORT_FILE: &str = "orchestration_test_report.json";

/// Scratch directory (under the working directory) holding repository clones.
pub const CLONE_DIR: &str = "temp_repos";

/// Debug log directory (under the working directory).
pub const LOGS_DIR: &str = ".safeprune/logs";

pub const DEFAULT_OWNER: &str = "Worldwidebro";
pub const DEFAULT_HOST: &str = "github.com";

/// `{file}` is replaced with the published file name.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Add {file} - restored by safeprune cleanup recovery";
