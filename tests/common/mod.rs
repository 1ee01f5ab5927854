#![allow(dead_code)]

pub mod mock_runtime;
pub mod mock_schema_writer;
pub mod strategies;

pub use mock_runtime::*;
pub use mock_schema_writer::*;

use std::time::Duration;
use testcontainers_spicedb::{PollingLogWatcher, SpiceDbConfig, SpiceDbContainer};

/// Schema used across the tests
pub const MODEL: &str = r#"
definition user {}

definition platform {
    relation administrator: user
    permission super_admin = administrator
}
"#;

/// Container wired to a mock runtime with a fast readiness poll
pub fn mock_container(config: SpiceDbConfig, runtime: MockRuntime) -> SpiceDbContainer {
    testcontainers_spicedb::logging::init_test_logging();

    SpiceDbContainer::new(config)
        .with_runtime(runtime)
        .with_log_watcher(PollingLogWatcher::new(Duration::from_millis(5)))
}

/// `host:port` with a non-empty host and a numeric port
pub fn is_host_port(endpoint: &str) -> bool {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.chars().any(char::is_whitespace)
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}
