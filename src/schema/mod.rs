//! # Schema Loading
//!
//! Writes a SpiceDB schema into a freshly started container. The controller
//! only knows the [`SchemaWriter`] trait; [`GrpcSchemaWriter`] is the default
//! and any closure with a matching signature can replace it.
//!
//! ```rust
//! use testcontainers_spicedb::{SchemaLoadError, SpiceDbConfig};
//!
//! let config = SpiceDbConfig::new()
//!     .with_model("definition user {}")
//!     .with_schema_writer(|endpoint: &str, schema: &str, secret_key: &str| {
//!         println!("would write {} bytes to {endpoint} with {secret_key}", schema.len());
//!         Ok::<(), SchemaLoadError>(())
//!     });
//! # let _ = config;
//! ```

pub mod grpc;
pub mod proto;

pub use grpc::{GrpcSchemaWriter, PresharedKeyInterceptor};

use thiserror::Error;

/// Schema write failures
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("Invalid gRPC endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Authentication rejected: {0}")]
    Unauthenticated(String),

    #[error("Schema rejected: {0}")]
    InvalidSchema(String),

    #[error("gRPC error {code:?}: {message}")]
    Rpc { code: tonic::Code, message: String },

    #[error("Failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Convert a gRPC status from the schema service
impl From<tonic::Status> for SchemaLoadError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unauthenticated | tonic::Code::PermissionDenied => {
                SchemaLoadError::Unauthenticated(status.message().to_string())
            }
            tonic::Code::InvalidArgument | tonic::Code::FailedPrecondition => {
                SchemaLoadError::InvalidSchema(status.message().to_string())
            }
            tonic::Code::Unavailable => SchemaLoadError::Connection {
                endpoint: "gRPC".to_string(),
                reason: status.message().to_string(),
            },
            code => SchemaLoadError::Rpc {
                code,
                message: status.message().to_string(),
            },
        }
    }
}

/// Writes a schema into a ready SpiceDB instance
pub trait SchemaWriter: Send + Sync {
    /// Write `schema` to the service at `endpoint` (`host:port`), authenticating with `secret_key`
    fn write(&self, endpoint: &str, schema: &str, secret_key: &str) -> Result<(), SchemaLoadError>;
}

impl<F> SchemaWriter for F
where
    F: Fn(&str, &str, &str) -> Result<(), SchemaLoadError> + Send + Sync,
{
    fn write(&self, endpoint: &str, schema: &str, secret_key: &str) -> Result<(), SchemaLoadError> {
        self(endpoint, schema, secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Status;

    #[test]
    fn test_status_unauthenticated() {
        let error: SchemaLoadError = Status::unauthenticated("invalid preshared key").into();
        assert!(matches!(error, SchemaLoadError::Unauthenticated(_)));
    }

    #[test]
    fn test_status_invalid_schema() {
        let error: SchemaLoadError = Status::invalid_argument("parse error in schema").into();
        assert!(matches!(error, SchemaLoadError::InvalidSchema(_)));
    }

    #[test]
    fn test_status_unavailable() {
        let error: SchemaLoadError = Status::unavailable("connection refused").into();
        assert!(matches!(error, SchemaLoadError::Connection { .. }));
    }

    #[test]
    fn test_status_other() {
        let error: SchemaLoadError = Status::internal("boom").into();
        assert!(matches!(
            error,
            SchemaLoadError::Rpc {
                code: tonic::Code::Internal,
                ..
            }
        ));
    }

    #[test]
    fn test_closure_writer() {
        let writer = |endpoint: &str, schema: &str, secret_key: &str| {
            assert_eq!(endpoint, "localhost:50051");
            assert_eq!(schema, "definition user {}");
            assert_eq!(secret_key, "key");
            Ok::<(), SchemaLoadError>(())
        };
        writer
            .write("localhost:50051", "definition user {}", "key")
            .unwrap();
    }

    #[test]
    fn test_custom_error_is_transparent() {
        let error = SchemaLoadError::from(anyhow::anyhow!("fixture rejected schema"));
        assert_eq!(error.to_string(), "fixture rejected schema");
    }
}
