//! # SpiceDB Container Lifecycle
//!
//! [`SpiceDbContainer`] owns exactly one container and drives it through
//! `created → starting → ready → stopped` (or `failed`). `start()` returns only
//! after the gRPC port is mapped, the readiness line has been logged and the
//! optional schema has been written. Every failure on that path is fatal.
//!
//! The container is released on every exit path:
//!
//! - [`SpiceDbContainer::scoped`] stops it after the body returns, whether the
//!   body succeeded or not.
//! - Dropping a container that still owns a process stops it, so a panicking
//!   test does not leak it.
//!
//! ```rust,no_run
//! use testcontainers_spicedb::{SpiceDbConfig, SpiceDbContainer};
//!
//! # fn main() -> anyhow::Result<()> {
//! SpiceDbContainer::new(SpiceDbConfig::new()).scoped(|spicedb| {
//!     let endpoint = spicedb.endpoint()?;
//!     let secret_key = spicedb.secret_key();
//!     println!("SpiceDB at {endpoint}, key {secret_key}");
//!     Ok::<(), anyhow::Error>(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! The API is blocking. Inside an async test, run it through
//! `tokio::task::spawn_blocking`.

use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

use crate::config::SpiceDbConfig;
use crate::error::{Result, SpiceDbError};
use crate::runtime::{
    ContainerProcess, ContainerRuntime, DockerRuntime, LogWatcher, PollingLogWatcher,
};
use crate::schema::{GrpcSchemaWriter, SchemaWriter};
use crate::state_machine::{ContainerState, LifecycleEvent, LifecycleStateMachine, Transition};

/// A SpiceDB test container and its lifecycle state
pub struct SpiceDbContainer {
    config: SpiceDbConfig,
    runtime: Arc<dyn ContainerRuntime>,
    log_watcher: Arc<dyn LogWatcher>,
    default_schema_writer: Arc<dyn SchemaWriter>,
    lifecycle: LifecycleStateMachine,
    process: Option<Box<dyn ContainerProcess>>,
    endpoint: OnceLock<String>,
}

impl SpiceDbContainer {
    /// Create a controller backed by Docker. Nothing is launched yet.
    pub fn new(config: SpiceDbConfig) -> Self {
        Self {
            config,
            runtime: Arc::new(DockerRuntime::new()),
            log_watcher: Arc::new(PollingLogWatcher::default()),
            default_schema_writer: Arc::new(GrpcSchemaWriter::new()),
            lifecycle: LifecycleStateMachine::new(),
            process: None,
            endpoint: OnceLock::new(),
        }
    }

    /// Use a different container runtime
    pub fn with_runtime(mut self, runtime: impl ContainerRuntime + 'static) -> Self {
        self.runtime = Arc::new(runtime);
        self
    }

    /// Use a different readiness watcher
    pub fn with_log_watcher(mut self, log_watcher: impl LogWatcher + 'static) -> Self {
        self.log_watcher = Arc::new(log_watcher);
        self
    }

    /// Replace the writer used when the configuration does not name one
    pub fn with_default_schema_writer(mut self, writer: impl SchemaWriter + 'static) -> Self {
        self.default_schema_writer = Arc::new(writer);
        self
    }

    /// Start the container and hand back ownership, ready for use
    pub fn started(mut self) -> Result<Self> {
        self.start()?;
        Ok(self)
    }

    /// Launch the container and block until it is ready.
    ///
    /// Fails with [`SpiceDbError::StartupTimeout`] when the readiness line is not
    /// logged in time and with [`SpiceDbError::SchemaLoad`] when the configured
    /// schema cannot be written. After a failure the controller is `failed` and
    /// still owns the launched process, if the runtime handed one over;
    /// `stop()` (or drop) releases it.
    pub fn start(&mut self) -> Result<&mut Self> {
        LifecycleStateMachine::determine_target_state(self.state(), LifecycleEvent::Start)?;
        let request = self.config.launch_request()?;

        self.lifecycle.transition(LifecycleEvent::Start)?;

        let process = match self.runtime.launch(&request) {
            Ok(process) => process,
            Err(error) => {
                self.lifecycle.transition(LifecycleEvent::Fail)?;
                return Err(error);
            }
        };
        let container_id = process.id().to_string();
        self.process = Some(process);

        match self.await_ready() {
            Ok(endpoint) => {
                let endpoint = self.endpoint.get_or_init(|| endpoint);
                self.lifecycle.transition(LifecycleEvent::Ready)?;
                info!(
                    container_id = %container_id,
                    endpoint = %endpoint,
                    schema_loaded = self.config.model().is_some(),
                    "SpiceDB container ready"
                );
                Ok(self)
            }
            Err(error) => {
                warn!(
                    container_id = %container_id,
                    error = %error,
                    "SpiceDB container failed to start"
                );
                self.lifecycle.transition(LifecycleEvent::Fail)?;
                Err(error)
            }
        }
    }

    /// Port mapping, readiness wait and schema load. Returns the endpoint.
    fn await_ready(&self) -> Result<String> {
        let process = self.process.as_deref().ok_or(SpiceDbError::NotStarted)?;

        let host_port = process.host_port(self.config.port())?;
        debug!(container_id = %process.id(), host_port, "gRPC port mapped");

        self.log_watcher.wait_for(
            process,
            self.config.ready_message(),
            self.config.startup_timeout(),
        )?;

        let endpoint = format!("{}:{}", process.host()?, host_port);

        if let Some(model) = self.config.model() {
            let writer = self
                .config
                .schema_writer()
                .unwrap_or(&self.default_schema_writer);

            debug!(endpoint = %endpoint, schema_bytes = model.len(), "Writing schema");
            writer.write(&endpoint, model, self.config.model_secret_key())?;
        }

        Ok(endpoint)
    }

    /// The gRPC endpoint as `host:port`.
    ///
    /// Resolved once and cached. Never waits for readiness; call it after
    /// `start()` succeeded.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = self.endpoint.get() {
            return Ok(endpoint.clone());
        }

        let process = self.process.as_deref().ok_or(SpiceDbError::NotStarted)?;
        let resolved = format!(
            "{}:{}",
            process.host()?,
            process.host_port(self.config.port())?
        );
        Ok(self.endpoint.get_or_init(|| resolved).clone())
    }

    /// Host port mapped to any exposed container port, e.g. the HTTP gateway
    pub fn mapped_port(&self, container_port: u16) -> Result<u16> {
        let process = self.process.as_deref().ok_or(SpiceDbError::NotStarted)?;
        process.host_port(container_port)
    }

    /// The gRPC pre-shared key; available in every state
    pub fn secret_key(&self) -> &str {
        self.config.secret_key()
    }

    pub fn config(&self) -> &SpiceDbConfig {
        &self.config
    }

    pub fn state(&self) -> ContainerState {
        self.lifecycle.current_state()
    }

    /// Lifecycle transitions taken so far, oldest first
    pub fn transitions(&self) -> &[Transition] {
        self.lifecycle.history()
    }

    /// Runtime id of the owned container, if one was launched and not yet stopped
    pub fn container_id(&self) -> Option<&str> {
        self.process.as_deref().map(|process| process.id())
    }

    /// Stop and remove the container.
    ///
    /// A no-op before `start()` and after a previous `stop()`. The controller
    /// moves to `stopped` even when the runtime reports a failure, so the
    /// release is never attempted twice.
    pub fn stop(&mut self) -> Result<()> {
        match self.state() {
            ContainerState::Stopped => {
                debug!("SpiceDB container already stopped");
                return Ok(());
            }
            state if !state.holds_process() => {
                debug!(state = %state, "SpiceDB container never launched; nothing to release");
                self.lifecycle.transition(LifecycleEvent::Stop)?;
                return Ok(());
            }
            _ => {}
        }

        let result = match self.process.take() {
            Some(mut process) => {
                let container_id = process.id().to_string();
                let result = process.stop();
                match &result {
                    Ok(()) => info!(container_id = %container_id, "SpiceDB container stopped"),
                    Err(error) => warn!(
                        container_id = %container_id,
                        error = %error,
                        "Failed to stop SpiceDB container"
                    ),
                }
                result
            }
            None => Ok(()),
        };

        self.lifecycle.transition(LifecycleEvent::Stop)?;
        result
    }

    /// Start, run `body`, then stop exactly once.
    ///
    /// The container is stopped whether `body` returns `Ok` or `Err`, and also
    /// when `start()` itself fails. A stop failure is returned only if nothing
    /// failed before it; otherwise it is logged and the first error wins.
    pub fn scoped<T, E, F>(mut self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&SpiceDbContainer) -> std::result::Result<T, E>,
        E: From<SpiceDbError>,
    {
        let outcome = match self.start() {
            Ok(_) => body(&self),
            Err(error) => Err(E::from(error)),
        };

        match (outcome, self.stop()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(stop_error)) => Err(E::from(stop_error)),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(stop_error)) => {
                warn!(error = %stop_error, "Ignoring cleanup failure after earlier error");
                Err(error)
            }
        }
    }
}

/// Run `body` against a freshly started container, stopping it afterwards
pub fn with_spicedb<T, E, F>(config: SpiceDbConfig, body: F) -> std::result::Result<T, E>
where
    F: FnOnce(&SpiceDbContainer) -> std::result::Result<T, E>,
    E: From<SpiceDbError>,
{
    SpiceDbContainer::new(config).scoped(body)
}

impl Drop for SpiceDbContainer {
    fn drop(&mut self) {
        if !self.state().holds_process() {
            return;
        }
        // Best effort cleanup
        if let Err(error) = self.stop() {
            warn!(error = %error, "Failed to stop SpiceDB container on drop");
        }
    }
}

impl fmt::Debug for SpiceDbContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpiceDbContainer")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("container_id", &self.container_id())
            .field("endpoint", &self.endpoint.get())
            .finish_non_exhaustive()
    }
}
