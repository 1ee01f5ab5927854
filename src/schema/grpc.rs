//! # Default gRPC Schema Writer
//!
//! Connects to the container's gRPC port with the pre-shared key as a bearer
//! token and calls `WriteSchema` once. No retries: a failed write fails startup.

use std::time::Duration;
use tonic::{
    metadata::{Ascii, MetadataValue},
    service::{interceptor::InterceptedService, Interceptor},
    transport::{Channel, Endpoint},
    Request, Status,
};
use tracing::{debug, info};

use super::proto::{SchemaServiceClient, WriteSchemaRequest, WriteSchemaResponse};
use super::{SchemaLoadError, SchemaWriter};

/// Adds `authorization: Bearer <key>` to every outgoing request
#[derive(Debug, Clone)]
pub struct PresharedKeyInterceptor {
    authorization: MetadataValue<Ascii>,
}

impl PresharedKeyInterceptor {
    pub fn new(secret_key: &str) -> Result<Self, SchemaLoadError> {
        let authorization = format!("Bearer {secret_key}").parse().map_err(|_| {
            SchemaLoadError::Unauthenticated(
                "pre-shared key is not valid ASCII metadata".to_string(),
            )
        })?;
        Ok(Self { authorization })
    }
}

impl Interceptor for PresharedKeyInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.authorization.clone());
        Ok(request)
    }
}

/// Writes the schema through `authzed.api.v1.SchemaService/WriteSchema`
#[derive(Debug, Clone)]
pub struct GrpcSchemaWriter {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Default for GrpcSchemaWriter {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GrpcSchemaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the tonic endpoint for a `host:port` (or full URL) target
    pub fn endpoint(&self, target: &str) -> Result<Endpoint, SchemaLoadError> {
        let url = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{target}")
        };

        let endpoint = Endpoint::from_shared(url).map_err(|e| SchemaLoadError::InvalidEndpoint {
            endpoint: target.to_string(),
            reason: e.to_string(),
        })?;

        Ok(endpoint
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout))
    }

    /// Async form of [`SchemaWriter::write`], for callers already on a runtime
    pub async fn write_async(
        &self,
        target: &str,
        schema: &str,
        secret_key: &str,
    ) -> Result<WriteSchemaResponse, SchemaLoadError> {
        let interceptor = PresharedKeyInterceptor::new(secret_key)?;
        let endpoint = self.endpoint(target)?;

        debug!(endpoint = %target, "Connecting to SpiceDB schema service");

        let channel: Channel =
            endpoint
                .connect()
                .await
                .map_err(|e| SchemaLoadError::Connection {
                    endpoint: target.to_string(),
                    reason: e.to_string(),
                })?;

        let mut client = SchemaServiceClient::new(InterceptedService::new(channel, interceptor));
        let response = client
            .write_schema(WriteSchemaRequest {
                schema: schema.to_string(),
            })
            .await?
            .into_inner();

        info!(
            endpoint = %target,
            schema_bytes = schema.len(),
            written_at = response.written_at.as_ref().map(|t| t.token.as_str()),
            "Schema written"
        );

        Ok(response)
    }
}

impl SchemaWriter for GrpcSchemaWriter {
    fn write(&self, endpoint: &str, schema: &str, secret_key: &str) -> Result<(), SchemaLoadError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.write_async(endpoint, schema, secret_key))?;
        Ok(())
    }
}
