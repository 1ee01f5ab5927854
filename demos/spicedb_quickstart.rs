//! SpiceDB Quickstart Demo
//!
//! Starts SpiceDB containers in the common configurations: defaults, a custom
//! pre-shared key, a preloaded schema, and explicit start/stop.
//!
//! Usage:
//!   cargo run --example spicedb_quickstart
//!   SPICEDB_TC_IMAGE=authzed/spicedb:v1.40.0 cargo run --example spicedb_quickstart

use anyhow::Result;
use testcontainers_spicedb::{with_spicedb, Model, SecretKey, SpiceDbConfig, SpiceDbContainer};
use tracing::info;

const SCHEMA: &str = r#"
definition user {}

definition document {
    relation owner: user
    relation viewer: user
    permission view = viewer + owner
}
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("spicedb_quickstart=info,testcontainers_spicedb=info")
        .init();

    info!("🔧 SpiceDB quickstart starting");

    // Defaults, with any SPICEDB_TC_* overrides applied
    with_spicedb(SpiceDbConfig::from_env()?, |spicedb| -> Result<()> {
        info!(
            "✅ SpiceDB running at {} (key: {})",
            spicedb.endpoint()?,
            spicedb.secret_key()
        );
        Ok(())
    })?;

    // Custom pre-shared key
    with_spicedb(
        SpiceDbConfig::new().with(SecretKey::new("mycustomsecret")),
        |spicedb| -> Result<()> {
            info!("✅ Custom key container at {}", spicedb.endpoint()?);
            Ok(())
        },
    )?;

    // Schema loaded before the body runs
    with_spicedb(
        SpiceDbConfig::new().with(Model::new(SCHEMA)),
        |spicedb| -> Result<()> {
            info!("✅ Schema loaded into {}", spicedb.endpoint()?);
            Ok(())
        },
    )?;

    // Explicit lifecycle
    let mut container = SpiceDbContainer::new(SpiceDbConfig::new().with_http(8443));
    container.start()?;
    info!(
        "✅ gRPC at {}, HTTP gateway on port {}",
        container.endpoint()?,
        container.mapped_port(8443)?
    );
    container.stop()?;

    info!("🎉 Quickstart complete");
    Ok(())
}
