//! # SpiceDB Container Configuration
//!
//! Immutable configuration captured before a container is started: image,
//! pre-shared key, gRPC port, optional schema and its loading strategy, and
//! optional feature toggles that extend the `spicedb serve` command line.
//!
//! ## Usage
//!
//! ```rust
//! use testcontainers_spicedb::{Feature, SpiceDbConfig};
//!
//! let config = SpiceDbConfig::new()
//!     .with_secret_key("mycustomsecret")
//!     .with_feature(Feature::http(8443));
//!
//! assert_eq!(config.secret_key(), "mycustomsecret");
//! assert!(config.exposed_ports().contains(&8443));
//! ```
//!
//! Defaults can be overridden from the environment with the `SPICEDB_TC_`
//! prefix (`SPICEDB_TC_IMAGE`, `SPICEDB_TC_SECRET_KEY`, `SPICEDB_TC_PORT`,
//! `SPICEDB_TC_STARTUP_TIMEOUT_SECS`, `SPICEDB_TC_READY_MESSAGE`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    flags, DEFAULT_GRPC_PORT, DEFAULT_IMAGE, DEFAULT_SECRET_KEY, DEFAULT_STARTUP_TIMEOUT,
    ENV_PREFIX, MAX_STARTUP_TIMEOUT, READY_MESSAGE,
};
use crate::customizers::Customizer;
use crate::error::{Result, SpiceDbError};
use crate::runtime::LaunchRequest;
use crate::schema::SchemaWriter;

/// An image reference split into repository and tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    /// Parse `repository[:tag]`, defaulting the tag to `latest`.
    ///
    /// A colon inside the registry host (`localhost:5000/spicedb`) is not a tag separator.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SpiceDbError::InvalidImage("image reference is empty".to_string()));
        }

        let (name, tag) = match reference.rsplit_once(':') {
            Some((name, tag)) if !tag.contains('/') => (name, tag),
            _ => (reference, "latest"),
        };

        if name.is_empty() || tag.is_empty() || reference.chars().any(char::is_whitespace) {
            return Err(SpiceDbError::InvalidImage(reference.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Optional extensions of the `spicedb serve` command line.
///
/// Features compose; any number of them can be enabled on one container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    /// Export traces to an OpenTelemetry collector
    Otel { provider: String, endpoint: String },
    /// Serve the HTTP gateway on the given container port
    Http { port: u16 },
}

impl Feature {
    pub fn otel(provider: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::Otel {
            provider: provider.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn http(port: u16) -> Self {
        Self::Http { port }
    }

    /// Arguments appended to the command line
    pub fn command_args(&self) -> Vec<String> {
        match self {
            Self::Otel { provider, endpoint } => vec![
                flags::OTEL_ENDPOINT.to_string(),
                endpoint.clone(),
                flags::OTEL_PROVIDER.to_string(),
                provider.clone(),
            ],
            Self::Http { port } => vec![
                flags::HTTP_ENABLED.to_string(),
                flags::HTTP_ADDR.to_string(),
                format!(":{port}"),
            ],
        }
    }

    /// Additional container ports that must be mapped
    pub fn exposed_ports(&self) -> Vec<u16> {
        match self {
            Self::Otel { .. } => Vec::new(),
            Self::Http { port } => vec![*port],
        }
    }
}

/// Environment-sourced overrides for the configuration defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiceDbSettings {
    pub image: Option<String>,
    pub secret_key: Option<String>,
    pub port: Option<u16>,
    pub startup_timeout_secs: Option<u64>,
    pub ready_message: Option<String>,
}

impl SpiceDbSettings {
    /// Load settings from `SPICEDB_TC_*` process environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(::config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings from an explicit environment source
    pub fn load(environment: ::config::Environment) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// Configuration for one SpiceDB test container
#[derive(Clone)]
pub struct SpiceDbConfig {
    image: String,
    secret_key: String,
    port: u16,
    model: Option<String>,
    model_secret_key: Option<String>,
    schema_writer: Option<Arc<dyn SchemaWriter>>,
    features: Vec<Feature>,
    startup_timeout: Duration,
    ready_message: String,
}

impl Default for SpiceDbConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            port: DEFAULT_GRPC_PORT,
            model: None,
            model_secret_key: None,
            schema_writer: None,
            features: Vec::new(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            ready_message: READY_MESSAGE.to_string(),
        }
    }
}

impl fmt::Debug for SpiceDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpiceDbConfig")
            .field("image", &self.image)
            .field("secret_key", &"[REDACTED]")
            .field("port", &self.port)
            .field("model", &self.model.as_ref().map(|m| format!("{} bytes", m.len())))
            .field("model_secret_key", &self.model_secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("custom_schema_writer", &self.schema_writer.is_some())
            .field("features", &self.features)
            .field("startup_timeout", &self.startup_timeout)
            .field("ready_message", &self.ready_message)
            .finish()
    }
}

impl SpiceDbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `SPICEDB_TC_*` environment variables
    pub fn from_env() -> Result<Self> {
        let settings = SpiceDbSettings::from_env()?;
        let config = Self::from_settings(settings);
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the given settings
    pub fn from_settings(settings: SpiceDbSettings) -> Self {
        debug!(
            image = ?settings.image,
            port = ?settings.port,
            startup_timeout_secs = ?settings.startup_timeout_secs,
            "Applying SpiceDB container settings"
        );

        let mut config = Self::default();
        if let Some(image) = settings.image {
            config.image = image;
        }
        if let Some(secret_key) = settings.secret_key {
            config.secret_key = secret_key;
        }
        if let Some(port) = settings.port {
            config.port = port;
        }
        if let Some(secs) = settings.startup_timeout_secs {
            config.startup_timeout = Duration::from_secs(secs);
        }
        if let Some(message) = settings.ready_message {
            config.ready_message = message;
        }
        config
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Schema to write once the service is ready
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Secret used for the schema write; defaults to the container secret key
    pub fn with_model_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.model_secret_key = Some(secret_key.into());
        self
    }

    /// Replace the default gRPC schema writer
    pub fn with_schema_writer(mut self, writer: impl SchemaWriter + 'static) -> Self {
        self.schema_writer = Some(Arc::new(writer));
        self
    }

    pub fn with_shared_schema_writer(mut self, writer: Arc<dyn SchemaWriter>) -> Self {
        self.schema_writer = Some(writer);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_otel(self, provider: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.with_feature(Feature::otel(provider, endpoint))
    }

    pub fn with_http(self, port: u16) -> Self {
        self.with_feature(Feature::http(port))
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_ready_message(mut self, message: impl Into<String>) -> Self {
        self.ready_message = message.into();
        self
    }

    /// Apply a customizer
    pub fn with(self, customizer: impl Customizer) -> Self {
        customizer.customize(self)
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Secret the schema write authenticates with
    pub fn model_secret_key(&self) -> &str {
        self.model_secret_key.as_deref().unwrap_or(&self.secret_key)
    }

    pub fn schema_writer(&self) -> Option<&Arc<dyn SchemaWriter>> {
        self.schema_writer.as_ref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn startup_timeout(&self) -> Duration {
        self.startup_timeout
    }

    pub fn ready_message(&self) -> &str {
        &self.ready_message
    }

    /// Full `spicedb` command line, features appended in the order they were added
    pub fn command(&self) -> Vec<String> {
        let mut command = vec![
            flags::SERVE.to_string(),
            flags::GRPC_PRESHARED_KEY.to_string(),
            self.secret_key.clone(),
        ];
        command.extend(self.features.iter().flat_map(Feature::command_args));
        command
    }

    /// gRPC port followed by any feature ports, without duplicates
    pub fn exposed_ports(&self) -> Vec<u16> {
        let mut ports = vec![self.port];
        for port in self.features.iter().flat_map(Feature::exposed_ports) {
            if !ports.contains(&port) {
                ports.push(port);
            }
        }
        ports
    }

    /// Reject configurations that cannot produce a working container
    pub fn validate(&self) -> Result<()> {
        ImageRef::parse(&self.image)?;

        if self.secret_key.is_empty() {
            return Err(SpiceDbError::configuration("secret key must not be empty"));
        }
        if self.port == 0 {
            return Err(SpiceDbError::configuration("gRPC port must not be zero"));
        }
        if self.ready_message.is_empty() {
            return Err(SpiceDbError::configuration("ready message must not be empty"));
        }
        if self.startup_timeout > MAX_STARTUP_TIMEOUT {
            return Err(SpiceDbError::configuration(format!(
                "startup timeout {}s exceeds the {}s maximum",
                self.startup_timeout.as_secs(),
                MAX_STARTUP_TIMEOUT.as_secs()
            )));
        }
        if self
            .features
            .iter()
            .any(|f| matches!(f, Feature::Http { port: 0 }))
        {
            return Err(SpiceDbError::configuration("HTTP port must not be zero"));
        }
        Ok(())
    }

    /// Build the runtime request for this configuration
    pub fn launch_request(&self) -> Result<LaunchRequest> {
        self.validate()?;
        Ok(LaunchRequest {
            image: ImageRef::parse(&self.image)?,
            command: self.command(),
            exposed_ports: self.exposed_ports(),
            ready_message: self.ready_message.clone(),
            startup_timeout: self.startup_timeout,
        })
    }
}
