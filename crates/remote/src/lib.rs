#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Remote source control for safeprune
//!
//! The remote host is an external collaborator. Everything the workflow needs
//! from it goes through [`RemoteSourceControl`]; [`GhRemote`] drives the `gh`
//! and `git` command line tools, [`InMemoryRemote`] is a scriptable stand-in.

mod gh;
mod memory;
pub mod parse;

pub use gh::GhRemote;
pub use memory::{InMemoryRemote, ScriptedFailure};

use async_trait::async_trait;
use safeprune_errors::RemoteError;
use std::path::Path;
use std::time::Duration;

/// Operations safeprune needs from a hosted source control service
#[async_trait]
pub trait RemoteSourceControl: Send + Sync {
    /// Names of repositories under `owner` containing a file called `filename`.
    ///
    /// An empty list is a valid answer; a response that cannot be parsed is
    /// `RemoteError::MalformedResponse`.
    async fn search_code(
        &self,
        filename: &str,
        owner: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError>;

    /// Top-level entry names of `owner/repo`
    async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError>;

    /// Up to `limit` repository names owned by `owner`
    async fn list_repositories(
        &self,
        owner: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<String>, RemoteError>;

    /// Succeeds when the client is authenticated with the host
    async fn auth_status(&self, timeout: Duration) -> Result<(), RemoteError>;

    /// Clone `owner/repo` into `destination`
    async fn clone_repository(
        &self,
        owner: &str,
        repo: &str,
        destination: &Path,
    ) -> Result<(), RemoteError>;

    /// Stage `filename` inside `repo_path`, commit it with `message` and push.
    ///
    /// Failures report the step (`add`, `commit`, `push`) through
    /// `RemoteError::CommitFailed`. Nothing is retried.
    async fn commit_and_push(
        &self,
        repo_path: &Path,
        filename: &str,
        message: &str,
    ) -> Result<(), RemoteError>;
}
