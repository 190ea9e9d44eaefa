//! Command line interface definition

use clap::{Parser, Subcommand};
use safeprune_config::ColorChoice;
use std::path::PathBuf;

/// safeprune - delete local files only once a remote repository holds them
#[derive(Parser)]
#[command(name = "safeprune")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verification-gated cleanup of files already published to a remote repository")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to <work-dir>/.safeprune/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the files to clean up (default: current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// Organization or user that owns the remote repositories
    #[arg(long, global = true, value_name = "ORG")]
    pub org: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify files as safe or unsafe to delete and write the cleanup report
    Verify {
        /// Files to verify (empty = configured cleanup candidates)
        files: Vec<String>,

        /// Write the report here instead of the working directory
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// Restore a file from the first backup source that has it
    Restore {
        /// File name relative to the working directory
        file: String,
    },

    /// Copy a local file into a remote repository, commit and push it
    Publish {
        /// File name relative to the working directory
        file: String,

        /// Target repository under the configured owner
        #[arg(long)]
        repo: String,
    },

    /// Restore a missing file, publish it and verify it again
    Recover {
        /// File name relative to the working directory
        file: String,

        /// Target repository under the configured owner
        #[arg(long)]
        repo: String,
    },

    /// List the top-level entries of a remote repository
    Contents {
        /// Repository name under the configured owner
        repo: String,
    },

    /// Run the health check suite and write its report
    #[command(name = "check-health")]
    CheckHealth {
        /// Write the report here instead of the working directory
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },
}

impl Commands {
    /// Operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Verify { .. } => "verify",
            Commands::Restore { .. } => "restore",
            Commands::Publish { .. } => "publish",
            Commands::Recover { .. } => "recover",
            Commands::Contents { .. } => "contents",
            Commands::CheckHealth { .. } => "check-health",
        }
    }
}
