//! Mock Container Runtime
//!
//! In-memory implementation of the runtime traits that records launches and
//! stops, so lifecycle tests can assert on side effects without Docker.

use parking_lot::Mutex;
use std::sync::Arc;
use testcontainers_spicedb::{
    ContainerProcess, ContainerRuntime, LaunchRequest, SpiceDbError, READY_MESSAGE,
};

/// Calls observed by the mock runtime
#[derive(Debug, Default, Clone)]
pub struct MockRuntimeState {
    /// Every launch request, in order
    pub launches: Vec<LaunchRequest>,
    /// Number of stop calls that reached a process
    pub stops: usize,
    /// Number of log reads across all processes
    pub log_reads: usize,
}

/// Shared view of the mock state, kept by the test after the runtime is moved
#[derive(Debug, Clone, Default)]
pub struct MockRuntimeHandle {
    state: Arc<Mutex<MockRuntimeState>>,
}

impl MockRuntimeHandle {
    pub fn launch_count(&self) -> usize {
        self.state.lock().launches.len()
    }

    pub fn stop_count(&self) -> usize {
        self.state.lock().stops
    }

    pub fn log_reads(&self) -> usize {
        self.state.lock().log_reads
    }

    pub fn last_launch(&self) -> Option<LaunchRequest> {
        self.state.lock().launches.last().cloned()
    }
}

/// Mock runtime with scripted readiness and failure behavior
#[derive(Debug, Clone)]
pub struct MockRuntime {
    handle: MockRuntimeHandle,
    host: String,
    port_offset: u16,
    /// Log reads before the ready message appears; `None` never logs it
    ready_after_reads: Option<usize>,
    launch_error: Option<String>,
    stop_error: Option<String>,
}

impl MockRuntime {
    /// Logs the ready message on the first read
    pub fn ready() -> Self {
        Self::ready_after(1)
    }

    pub fn ready_after(reads: usize) -> Self {
        Self {
            handle: MockRuntimeHandle::default(),
            host: "localhost".to_string(),
            port_offset: 10000,
            ready_after_reads: Some(reads),
            launch_error: None,
            stop_error: None,
        }
    }

    /// Never logs the ready message
    pub fn never_ready() -> Self {
        Self {
            ready_after_reads: None,
            ..Self::ready()
        }
    }

    /// Fails every launch with the given runtime error
    pub fn failing_launch(message: impl Into<String>) -> Self {
        Self {
            launch_error: Some(message.into()),
            ..Self::ready()
        }
    }

    /// Fails every stop with the given runtime error
    pub fn failing_stop(mut self, message: impl Into<String>) -> Self {
        self.stop_error = Some(message.into());
        self
    }

    pub fn handle(&self) -> MockRuntimeHandle {
        self.handle.clone()
    }
}

impl ContainerRuntime for MockRuntime {
    fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn ContainerProcess>, SpiceDbError> {
        let mut state = self.handle.state.lock();
        state.launches.push(request.clone());

        if let Some(message) = &self.launch_error {
            return Err(SpiceDbError::runtime(std::io::Error::other(message.clone())));
        }

        Ok(Box::new(MockProcess {
            id: format!("mock-{}", state.launches.len()),
            runtime: self.clone(),
        }))
    }
}

struct MockProcess {
    id: String,
    runtime: MockRuntime,
}

impl ContainerProcess for MockProcess {
    fn id(&self) -> &str {
        &self.id
    }

    fn host(&self) -> Result<String, SpiceDbError> {
        Ok(self.runtime.host.clone())
    }

    fn host_port(&self, container_port: u16) -> Result<u16, SpiceDbError> {
        Ok(container_port.wrapping_add(self.runtime.port_offset))
    }

    fn logs(&self) -> Result<String, SpiceDbError> {
        let mut state = self.runtime.handle.state.lock();
        state.log_reads += 1;

        let mut logs = String::from("{\"level\":\"info\",\"message\":\"configured logging\"}\n");
        if matches!(self.runtime.ready_after_reads, Some(n) if state.log_reads >= n) {
            logs.push_str(&format!("{{\"level\":\"info\",\"message\":\"{READY_MESSAGE}\"}}\n"));
        }
        Ok(logs)
    }

    fn stop(&mut self) -> Result<(), SpiceDbError> {
        self.runtime.handle.state.lock().stops += 1;
        match &self.runtime.stop_error {
            Some(message) => Err(SpiceDbError::runtime(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }
}
