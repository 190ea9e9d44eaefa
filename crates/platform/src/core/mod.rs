//! Core platform abstractions and context management

use safeprune_events::{AppEvent, EventEmitter, EventSender};
use std::sync::Arc;

use crate::implementations::native::NativeProcessOperations;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Context for platform operations, providing event emission
#[derive(Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self { event_sender }
    }

    /// Emit a platform event if an event sender is available
    pub fn emit_event(&self, event: AppEvent) {
        self.emit(event);
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Main platform abstraction providing access to platform operations
#[derive(Clone)]
pub struct Platform {
    process_ops: Arc<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementation
    #[must_use]
    pub fn new(process_ops: Arc<dyn ProcessOperations>) -> Self {
        Self { process_ops }
    }

    /// Platform backed by real child processes
    #[must_use]
    pub fn current() -> Self {
        Self::new(Arc::new(NativeProcessOperations::new()))
    }

    /// Access process operations
    #[must_use]
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }

    /// Convenience method: Create a new command builder
    #[must_use]
    pub fn command(&self, program: &str) -> PlatformCommand {
        self.process().create_command(program)
    }

    /// Convenience method: Execute a command and get output
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    pub async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, safeprune_errors::Error> {
        self.process().execute_command(ctx, cmd).await
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
