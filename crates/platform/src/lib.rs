#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for safeprune.
//!
//! This crate provides:
//! - Process execution with bounded waits and event emission
//! - Filesystem helpers returning `safeprune_errors::Error`
//!
//! Every command carries an explicit working directory; nothing here changes
//! the process-wide current directory.

pub mod core;
pub mod fs;
pub mod implementations;
pub mod process;

pub use core::{Platform, PlatformContext};
pub use implementations::native::NativeProcessOperations;
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
