#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # testcontainers-spicedb
//!
//! A test fixture that runs [SpiceDB](https://authzed.com/spicedb) in a Docker
//! container, waits until its gRPC listener is up, optionally loads a schema,
//! and hands the endpoint and pre-shared key to the test.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use testcontainers_spicedb::{with_spicedb, SpiceDbConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let schema = r#"
//!     definition user {}
//!
//!     definition document {
//!         relation owner: user
//!         relation viewer: user
//!         permission view = viewer + owner
//!     }
//! "#;
//!
//! with_spicedb(SpiceDbConfig::new().with_model(schema), |spicedb| {
//!     let endpoint = spicedb.endpoint()?;
//!     let secret_key = spicedb.secret_key();
//!     // connect a SpiceDB client to `endpoint` using `secret_key`...
//!     # let _ = (endpoint, secret_key);
//!     Ok::<(), anyhow::Error>(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`container`] - Lifecycle controller and scoped usage
//! - [`config`] - Container configuration and environment overrides
//! - [`customizers`] - Reusable configuration fragments
//! - [`runtime`] - Container runtime and readiness watcher seams
//! - [`schema`] - Schema writer trait and the default gRPC writer
//! - [`state_machine`] - Lifecycle states and transitions
//! - [`error`] - Structured error handling
//! - [`logging`] - Test logging setup
//!
//! ## Testing
//!
//! ```bash
//! cargo test                      # Unit and mock-backed tests
//! cargo test -- --ignored         # Docker-backed tests
//! ```

pub mod config;
pub mod constants;
pub mod container;
pub mod customizers;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod schema;
pub mod state_machine;

pub use crate::config::{Feature, ImageRef, SpiceDbConfig, SpiceDbSettings};
pub use crate::constants::{DEFAULT_GRPC_PORT, DEFAULT_IMAGE, DEFAULT_SECRET_KEY, READY_MESSAGE};
pub use crate::container::{with_spicedb, SpiceDbContainer};
pub use crate::customizers::{Customizer, Model, SecretKey};
pub use crate::error::{Result, SpiceDbError};
pub use crate::runtime::{
    ContainerProcess, ContainerRuntime, DockerRuntime, LaunchRequest, LogWatcher,
    PollingLogWatcher,
};
pub use crate::schema::{GrpcSchemaWriter, SchemaLoadError, SchemaWriter};
pub use crate::state_machine::{ContainerState, LifecycleEvent, Transition};
