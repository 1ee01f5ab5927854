//! # Test Logging
//!
//! Installs a `tracing` subscriber for test runs so container lifecycle events
//! show up next to test output. Safe to call from every test: the subscriber is
//! set up once per process and an existing global subscriber is left alone.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for tests
pub fn init_test_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if json_output() {
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(filter)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::debug!(environment = %environment, "Test logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("SPICEDB_TEST_ENV").unwrap_or_else(|_| "test".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "test" | "development" => "testcontainers_spicedb=debug,testcontainers=info,warn",
        _ => "info",
    }
}

fn json_output() -> bool {
    std::env::var("SPICEDB_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}
