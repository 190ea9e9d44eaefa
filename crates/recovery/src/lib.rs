#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Recovery paths for files that failed verification
//!
//! [`BackupRestorer`] brings a missing file back from the first backup source
//! that has it. [`RemotePublisher`] pushes a local file into a repository so a
//! later verification finds it.

mod publisher;
mod restorer;
mod sources;

pub use publisher::{PublishOutcome, RemotePublisher};
pub use restorer::{BackupRestorer, RestoreOutcome};
pub use sources::{DirectorySource, Retrievable, VcsObjectSource};
