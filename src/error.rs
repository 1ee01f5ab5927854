//! # Error Types
//!
//! Structured error handling for the container lifecycle using thiserror.
//! Runtime failures from the container engine are carried through untouched
//! as the error source.

use std::time::Duration;
use thiserror::Error;

use crate::schema::SchemaLoadError;
use crate::state_machine::{ContainerState, LifecycleEvent};

/// Boxed error type used to pass container-runtime failures through unchanged
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, SpiceDbError>;

/// Errors surfaced by the SpiceDB container fixture
#[derive(Debug, Error)]
pub enum SpiceDbError {
    #[error("SpiceDB did not log {message:?} within {}s", timeout.as_secs_f64())]
    StartupTimeout { message: String, timeout: Duration },

    #[error("Schema load failed: {0}")]
    SchemaLoad(#[from] SchemaLoadError),

    #[error("Container runtime error: {0}")]
    Runtime(#[source] BoxError),

    #[error("Invalid lifecycle transition: {event} is not allowed from {from}")]
    InvalidTransition {
        from: ContainerState,
        event: LifecycleEvent,
    },

    #[error("Container has not been started")]
    NotStarted,

    #[error("Invalid image reference: {0}")]
    InvalidImage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SpiceDbError {
    /// Wrap a container-runtime error
    pub fn runtime(error: impl Into<BoxError>) -> Self {
        Self::Runtime(error.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error came from the readiness wait
    pub fn is_startup_timeout(&self) -> bool {
        matches!(self, Self::StartupTimeout { .. })
    }
}

impl From<testcontainers::TestcontainersError> for SpiceDbError {
    fn from(error: testcontainers::TestcontainersError) -> Self {
        Self::Runtime(Box::new(error))
    }
}

impl From<::config::ConfigError> for SpiceDbError {
    fn from(error: ::config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_timeout_message() {
        let error = SpiceDbError::StartupTimeout {
            message: "grpc server started serving".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(error.is_startup_timeout());
        assert_eq!(
            error.to_string(),
            "SpiceDB did not log \"grpc server started serving\" within 30s"
        );
    }

    #[test]
    fn test_runtime_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "pull access denied");
        let error = SpiceDbError::runtime(io);
        assert!(!error.is_startup_timeout());
        let source = std::error::Error::source(&error).expect("source should be kept");
        assert_eq!(source.to_string(), "pull access denied");
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = SpiceDbError::InvalidTransition {
            from: ContainerState::Stopped,
            event: LifecycleEvent::Start,
        };
        assert_eq!(
            error.to_string(),
            "Invalid lifecycle transition: start is not allowed from stopped"
        );
    }
}
