//! # Readiness Log Watcher
//!
//! Waits for a marker line in the container output, bounded by a deadline.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::ContainerProcess;
use crate::constants::DEFAULT_POLL_INTERVAL;
use crate::error::{Result, SpiceDbError};

/// Blocks until a message shows up in a container's logs
pub trait LogWatcher: Send + Sync {
    /// Return `Ok` once `message` appears, or `StartupTimeout` after `timeout`
    fn wait_for(
        &self,
        process: &dyn ContainerProcess,
        message: &str,
        timeout: Duration,
    ) -> Result<()>;
}

/// Re-reads the full log output on a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct PollingLogWatcher {
    interval: Duration,
}

impl PollingLogWatcher {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollingLogWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl LogWatcher for PollingLogWatcher {
    fn wait_for(
        &self,
        process: &dyn ContainerProcess,
        message: &str,
        timeout: Duration,
    ) -> Result<()> {
        let started = Instant::now();
        // No representable deadline means no deadline
        let deadline = started.checked_add(timeout);
        let mut polls = 0u32;

        loop {
            polls += 1;
            if process.logs()?.contains(message) {
                info!(
                    container_id = %process.id(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Readiness message observed"
                );
                return Ok(());
            }

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    debug!(container_id = %process.id(), polls, "Readiness wait timed out");
                    return Err(SpiceDbError::StartupTimeout {
                        message: message.to_string(),
                        timeout,
                    });
                }
                Some(deadline) => self.interval.min(deadline - now),
                None => self.interval,
            };

            std::thread::sleep(pause);
        }
    }
}
