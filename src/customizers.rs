//! # Container Customizers
//!
//! Reusable configuration fragments. Each one knows how to fold itself into a
//! [`SpiceDbConfig`], so test suites can share them:
//!
//! ```rust
//! use testcontainers_spicedb::{Feature, Model, SecretKey, SpiceDbConfig};
//!
//! let config = SpiceDbConfig::new()
//!     .with(SecretKey::new("mycustomsecret"))
//!     .with(Model::new("definition user {}"))
//!     .with(Feature::http(8443));
//!
//! assert_eq!(config.model_secret_key(), "mycustomsecret");
//! ```

use std::sync::Arc;

use crate::config::{Feature, SpiceDbConfig};
use crate::schema::SchemaWriter;

/// A configuration fragment
pub trait Customizer {
    fn customize(self, config: SpiceDbConfig) -> SpiceDbConfig;
}

/// Sets the gRPC pre-shared key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey(pub String);

impl SecretKey {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self(secret_key.into())
    }
}

impl Customizer for SecretKey {
    fn customize(self, config: SpiceDbConfig) -> SpiceDbConfig {
        config.with_secret_key(self.0)
    }
}

/// Loads a schema at startup, optionally with its own key and writer
#[derive(Clone)]
pub struct Model {
    model: String,
    secret_key: Option<String>,
    schema_writer: Option<Arc<dyn SchemaWriter>>,
}

impl Model {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            secret_key: None,
            schema_writer: None,
        }
    }

    /// Authenticate the schema write with this key instead of the container key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_schema_writer(mut self, writer: impl SchemaWriter + 'static) -> Self {
        self.schema_writer = Some(Arc::new(writer));
        self
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("model_bytes", &self.model.len())
            .field("custom_schema_writer", &self.schema_writer.is_some())
            .finish_non_exhaustive()
    }
}

impl Customizer for Model {
    fn customize(self, config: SpiceDbConfig) -> SpiceDbConfig {
        let mut config = config.with_model(self.model);
        if let Some(secret_key) = self.secret_key {
            config = config.with_model_secret_key(secret_key);
        }
        if let Some(writer) = self.schema_writer {
            config = config.with_shared_schema_writer(writer);
        }
        config
    }
}

impl Customizer for Feature {
    fn customize(self, config: SpiceDbConfig) -> SpiceDbConfig {
        config.with_feature(self)
    }
}
