#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Verification-gated cleanup for safeprune
//!
//! A candidate file is SAFE to delete only when the remote host proves it
//! exists in at least one repository. Everything else (absent, query failed,
//! query timed out, unreadable answer) is UNSAFE. Nothing here deletes files.

mod classifier;
mod oracle;
mod report;

pub use classifier::{ClassificationReport, Classifier, Verdict};
pub use oracle::{FailureKind, Oracle, OracleAnswer, DEFAULT_SEARCH_TIMEOUT};
pub use report::{write_report, CleanupReport};
