use serde::{Deserialize, Serialize};
use std::fmt;

/// Events that drive container lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Launch the container process
    Start,
    /// Port mapped, readiness line seen and schema (if any) written
    Ready,
    /// Readiness wait, port resolution or schema load failed
    Fail,
    /// Stop and remove the container
    Stop,
}

impl LifecycleEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Ready => "ready",
            Self::Fail => "fail",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_type())
    }
}
