#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Health check suite for safeprune
//!
//! A suite is an ordered list of named [`Probe`]s. Probes run one after
//! another; an error or panic in one is recorded as a failure and the rest
//! still run. Results are aggregated into a [`TestReport`].

mod probe;
pub mod probes;
mod suite;

pub use probe::{FnProbe, Probe};
pub use probes::{default_probes, ProbeEnv};
pub use suite::{
    success_rate, write_report, HealthCheckResult, HealthSuite, SystemStatus, TestReport,
};
