//! Recording schema writer used in place of the gRPC writer

use parking_lot::Mutex;
use std::sync::Arc;
use testcontainers_spicedb::{SchemaLoadError, SchemaWriter};

/// One observed schema write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWrite {
    pub endpoint: String,
    pub schema: String,
    pub secret_key: String,
}

/// Records every call; optionally rejects the schema
#[derive(Debug, Clone, Default)]
pub struct RecordingSchemaWriter {
    calls: Arc<Mutex<Vec<SchemaWrite>>>,
    reject_with: Option<String>,
}

impl RecordingSchemaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            reject_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SchemaWrite> {
        self.calls.lock().clone()
    }
}

impl SchemaWriter for RecordingSchemaWriter {
    fn write(&self, endpoint: &str, schema: &str, secret_key: &str) -> Result<(), SchemaLoadError> {
        self.calls.lock().push(SchemaWrite {
            endpoint: endpoint.to_string(),
            schema: schema.to_string(),
            secret_key: secret_key.to_string(),
        });

        match &self.reject_with {
            Some(message) => Err(SchemaLoadError::InvalidSchema(message.clone())),
            None => Ok(()),
        }
    }
}
