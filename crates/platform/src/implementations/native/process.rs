//! Process operations implementation
//!
//! Wraps `tokio::process::Command` with an optional bounded wait and emits
//! platform events around every execution.

use async_trait::async_trait;
use safeprune_errors::{Error, PlatformError};
use safeprune_events::{
    events::ProcessCommandDescriptor, AppEvent, FailureContext, PlatformEvent,
};
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Process operations using real child processes
pub struct NativeProcessOperations;

impl NativeProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeProcessOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn descriptor(cmd: &PlatformCommand) -> ProcessCommandDescriptor {
    ProcessCommandDescriptor {
        program: cmd.program().to_string(),
        args: cmd.get_args().to_vec(),
        cwd: cmd.get_current_dir().cloned(),
    }
}

async fn run(cmd: &PlatformCommand) -> Result<CommandOutput, PlatformError> {
    let mut command = Command::new(cmd.program());
    command.args(cmd.get_args()).kill_on_drop(true);

    if let Some(dir) = cmd.get_current_dir() {
        command.current_dir(dir);
    }

    let output = command.output();
    let output = match cmd.get_timeout() {
        Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
            PlatformError::ProcessTimedOut {
                command: cmd.display(),
                timeout_secs: limit.as_secs(),
            }
        })?,
        None => output.await,
    };

    let output = output.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PlatformError::CommandNotFound {
                command: cmd.program().to_string(),
            }
        } else {
            PlatformError::ProcessExecutionFailed {
                command: cmd.display(),
                message: e.to_string(),
            }
        }
    })?;

    Ok(CommandOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

#[async_trait]
impl ProcessOperations for NativeProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let command = descriptor(&cmd);

        ctx.emit_event(AppEvent::Platform(PlatformEvent::ProcessStarted {
            command: command.clone(),
        }));
        tracing::debug!(command = %cmd.display(), cwd = ?cmd.get_current_dir(), "executing");

        let result = run(&cmd).await;
        let duration_ms = duration_to_millis(start.elapsed());

        match &result {
            Ok(output) => {
                ctx.emit_event(AppEvent::Platform(PlatformEvent::ProcessCompleted {
                    command,
                    exit_code: output.status.code(),
                    duration_ms,
                }));
            }
            Err(e) => {
                ctx.emit_event(AppEvent::Platform(PlatformEvent::ProcessFailed {
                    command,
                    failure: FailureContext::from_error(e),
                    duration_ms,
                }));
            }
        }

        result.map_err(Error::from)
    }
}
