use serde::{Deserialize, Serialize};

use crate::EventSource;
use safeprune_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod health;
pub mod platform;
pub mod recovery;
pub mod verification;

pub use general::*;
pub use health::*;
pub use platform::*;
pub use recovery::*;
pub use verification::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Remote existence checks and classification
    Verification(VerificationEvent),

    /// Backup restore and re-publish
    Recovery(RecoveryEvent),

    /// Health check suite progress
    Health(HealthEvent),

    /// External process execution
    Platform(PlatformEvent),
}

impl AppEvent {
    /// Identify the source domain for this event.
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Verification(_) => EventSource::Verify,
            Self::Recovery(_) => EventSource::Recovery,
            Self::Health(_) => EventSource::Health,
            Self::Platform(_) => EventSource::Platform,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::OperationFailed { .. })
            | Self::Recovery(RecoveryEvent::PublishFailed { .. })
            | Self::Platform(PlatformEvent::ProcessFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Verification(
                VerificationEvent::MalformedResponse { .. }
                | VerificationEvent::FileClassified { safe: false, .. },
            )
            | Self::Recovery(
                RecoveryEvent::SourceSkipped { .. } | RecoveryEvent::RestoreFailed { .. },
            )
            | Self::Health(HealthEvent::ProbeFailed { .. }) => Level::WARN,

            Self::Verification(VerificationEvent::FileQueried { .. })
            | Self::Health(HealthEvent::ProbeStarted { .. })
            | Self::Platform(
                PlatformEvent::ProcessStarted { .. } | PlatformEvent::ProcessCompleted { .. },
            ) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "safeprune::events::general",
            Self::Verification(_) => "safeprune::events::verify",
            Self::Recovery(_) => "safeprune::events::recovery",
            Self::Health(_) => "safeprune::events::health",
            Self::Platform(_) => "safeprune::events::platform",
        }
    }

    /// The file, repository or probe this event is about, if any.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        match self {
            Self::Verification(event) => event.file().map(str::to_string),
            Self::Recovery(event) => Some(event.file().to_string()),
            Self::Health(event) => event.probe().map(str::to_string),
            Self::General(_) | Self::Platform(_) => None,
        }
    }
}
