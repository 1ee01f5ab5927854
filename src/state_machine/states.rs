use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a SpiceDB test container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContainerState {
    /// Configured, nothing launched yet
    #[default]
    Created,
    /// Container process launched, waiting for readiness and the optional schema load
    Starting,
    /// Endpoint resolved, readiness observed and schema (if any) written
    Ready,
    /// Startup failed; the launched process may still need to be released
    Failed,
    /// Container stopped and removed
    Stopped,
}

impl ContainerState {
    /// Check if a container process may exist in this state
    pub fn holds_process(&self) -> bool {
        matches!(self, Self::Starting | Self::Ready | Self::Failed)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Starting => write!(f, "starting"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

impl std::str::FromStr for ContainerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "starting" => Ok(Self::Starting),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            "stopped" => Ok(Self::Stopped),
            _ => Err(format!("Invalid container state: {s}")),
        }
    }
}
