//! # SpiceDB Container Constants
//!
//! Defaults shared by the configuration layer, the lifecycle controller and the tests.

use std::time::Duration;

/// Image used when no image is configured
pub const DEFAULT_IMAGE: &str = "authzed/spicedb:v1.47.1";

/// Pre-shared key used when no secret key is configured.
///
/// This value is public and only suitable for throwaway test containers.
pub const DEFAULT_SECRET_KEY: &str = "somepresharedkey";

/// gRPC port SpiceDB listens on inside the container
pub const DEFAULT_GRPC_PORT: u16 = 50051;

/// Log line SpiceDB prints once its gRPC listener accepts connections
pub const READY_MESSAGE: &str = "grpc server started serving";

/// Upper bound on the readiness wait
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest readiness wait a configuration may ask for
pub const MAX_STARTUP_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Interval between log polls while waiting for readiness
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SPICEDB_TC";

/// Flags on the `spicedb` command line
pub mod flags {
    pub const SERVE: &str = "serve";
    pub const GRPC_PRESHARED_KEY: &str = "--grpc-preshared-key";
    pub const OTEL_ENDPOINT: &str = "--otel-endpoint";
    pub const OTEL_PROVIDER: &str = "--otel-provider";
    pub const HTTP_ENABLED: &str = "--http-enabled";
    pub const HTTP_ADDR: &str = "--http-addr";
}
