//! # Container Runtime Abstractions
//!
//! The lifecycle controller talks to the container engine only through the
//! traits in this module, so the Docker-backed implementation can be swapped
//! for an in-memory one in tests.
//!
//! ```text
//! ContainerRuntime ──launch──▶ ContainerProcess ◀──poll── LogWatcher
//! ```

pub mod docker;
pub mod log_watcher;

pub use docker::DockerRuntime;
pub use log_watcher::{LogWatcher, PollingLogWatcher};

use std::time::Duration;

use crate::config::ImageRef;
use crate::error::Result;

/// Everything the runtime needs to create and start one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub image: ImageRef,
    /// Arguments passed to the image entrypoint
    pub command: Vec<String>,
    /// Container ports (TCP) that must be mapped to host ports
    pub exposed_ports: Vec<u16>,
    /// Log line that marks the container as ready
    pub ready_message: String,
    /// Bound on the readiness wait
    pub startup_timeout: Duration,
}

/// Creates and starts containers
pub trait ContainerRuntime: Send + Sync {
    /// Create and start a container. A runtime may already wait for
    /// `ready_message` here; the controller confirms readiness either way.
    fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn ContainerProcess>>;
}

/// A running container owned by exactly one controller
pub trait ContainerProcess: Send {
    /// Runtime identifier of the container
    fn id(&self) -> &str;

    /// Host address the mapped ports are reachable on
    fn host(&self) -> Result<String>;

    /// Host port mapped to the given container port
    fn host_port(&self, container_port: u16) -> Result<u16>;

    /// Everything the container has written to stdout and stderr so far
    fn logs(&self) -> Result<String>;

    /// Stop and remove the container
    fn stop(&mut self) -> Result<()>;
}
