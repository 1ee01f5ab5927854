//! # Docker Runtime
//!
//! `ContainerRuntime` backed by testcontainers' blocking runner.
//!
//! The readiness wait happens inside `launch`: testcontainers follows the log
//! stream until the ready message shows up, so the controller's own watcher
//! finds it on its first read.

use testcontainers::core::error::WaitContainerError;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, TestcontainersError};
use tracing::{debug, info};

use super::{ContainerProcess, ContainerRuntime, LaunchRequest};
use crate::error::{Result, SpiceDbError};

/// Launches containers on the local Docker daemon
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerRuntime;

impl DockerRuntime {
    pub fn new() -> Self {
        Self
    }
}

impl ContainerRuntime for DockerRuntime {
    fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn ContainerProcess>> {
        let image = request
            .exposed_ports
            .iter()
            .fold(
                GenericImage::new(request.image.name.clone(), request.image.tag.clone()),
                |image, port| image.with_exposed_port(ContainerPort::Tcp(*port)),
            )
            .with_wait_for(WaitFor::message_on_either_std(request.ready_message.clone()));

        info!(
            image = %request.image,
            command = ?request.command,
            ports = ?request.exposed_ports,
            "Starting container"
        );

        let container = image
            .with_cmd(request.command.clone())
            .with_startup_timeout(request.startup_timeout)
            .start()
            .map_err(|error| match error {
                TestcontainersError::WaitContainer(WaitContainerError::StartupTimeout) => {
                    SpiceDbError::StartupTimeout {
                        message: request.ready_message.clone(),
                        timeout: request.startup_timeout,
                    }
                }
                other => SpiceDbError::from(other),
            })?;
        let id = container.id().to_string();

        debug!(container_id = %id, "Container started");

        Ok(Box::new(DockerContainer {
            id,
            container: Some(container),
        }))
    }
}

/// A container started by [`DockerRuntime`]
pub struct DockerContainer {
    id: String,
    container: Option<Container<GenericImage>>,
}

impl DockerContainer {
    fn container(&self) -> Result<&Container<GenericImage>> {
        self.container.as_ref().ok_or(SpiceDbError::NotStarted)
    }
}

impl ContainerProcess for DockerContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn host(&self) -> Result<String> {
        Ok(self.container()?.get_host()?.to_string())
    }

    fn host_port(&self, container_port: u16) -> Result<u16> {
        Ok(self
            .container()?
            .get_host_port_ipv4(ContainerPort::Tcp(container_port))?)
    }

    fn logs(&self) -> Result<String> {
        let container = self.container()?;
        let stdout = container.stdout_to_vec()?;
        let stderr = container.stderr_to_vec()?;

        let mut logs = String::from_utf8_lossy(&stdout).into_owned();
        logs.push_str(&String::from_utf8_lossy(&stderr));
        Ok(logs)
    }

    fn stop(&mut self) -> Result<()> {
        let Some(container) = self.container.take() else {
            return Ok(());
        };

        info!(container_id = %self.id, "Stopping container");

        // Remove even when the stop request fails, then report the stop error.
        let stopped = container.stop();
        container.rm()?;
        stopped?;

        debug!(container_id = %self.id, "Container stopped and removed");
        Ok(())
    }
}
