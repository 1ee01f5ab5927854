//! Docker-backed tests against a real SpiceDB image.
//!
//! ```bash
//! cargo test --test docker_integration_tests -- --ignored
//! ```

mod common;

use anyhow::Result;
use common::{is_host_port, MODEL};
use testcontainers_spicedb::logging::init_test_logging;
use testcontainers_spicedb::{
    with_spicedb, ContainerState, GrpcSchemaWriter, Model, SchemaLoadError, SchemaWriter,
    SecretKey, SpiceDbConfig, SpiceDbContainer,
};

#[test]
#[ignore] // Only run when Docker is available
fn test_basic_container() -> Result<()> {
    init_test_logging();

    with_spicedb(SpiceDbConfig::new(), |spicedb| -> Result<()> {
        let endpoint = spicedb.endpoint()?;
        assert!(is_host_port(&endpoint), "unexpected endpoint {endpoint}");
        assert_eq!(spicedb.secret_key(), "somepresharedkey");
        assert_eq!(spicedb.state(), ContainerState::Ready);
        Ok(())
    })
}

#[test]
#[ignore] // Only run when Docker is available
fn test_custom_secret_key_is_enforced() -> Result<()> {
    init_test_logging();

    let config = SpiceDbConfig::new().with(SecretKey::new("mycustomsecret"));
    with_spicedb(config, |spicedb| -> Result<()> {
        let endpoint = spicedb.endpoint()?;
        let writer = GrpcSchemaWriter::new();

        writer.write(&endpoint, MODEL, "mycustomsecret")?;

        let rejected = writer.write(&endpoint, MODEL, "wrongkey");
        assert!(
            matches!(rejected, Err(SchemaLoadError::Unauthenticated(_))),
            "unexpected result: {rejected:?}"
        );
        Ok(())
    })
}

#[test]
#[ignore] // Only run when Docker is available
fn test_model_is_loaded_on_start() -> Result<()> {
    init_test_logging();

    let config = SpiceDbConfig::new().with(Model::new(MODEL));
    with_spicedb(config, |spicedb| -> Result<()> {
        // Schema already present; an identical rewrite is a no-op
        GrpcSchemaWriter::new().write(&spicedb.endpoint()?, MODEL, spicedb.secret_key())?;
        Ok(())
    })
}

#[test]
#[ignore] // Only run when Docker is available
fn test_invalid_model_fails_startup() {
    init_test_logging();

    let config = SpiceDbConfig::new().with_model("definition user { relation }");
    let mut container = SpiceDbContainer::new(config);

    let error = container.start().unwrap_err();
    assert!(
        matches!(
            error,
            testcontainers_spicedb::SpiceDbError::SchemaLoad(SchemaLoadError::InvalidSchema(_))
        ),
        "unexpected error: {error}"
    );
    assert_eq!(container.state(), ContainerState::Failed);
    container.stop().unwrap();
}

#[test]
#[ignore] // Only run when Docker is available
fn test_http_gateway_port_is_mapped() -> Result<()> {
    init_test_logging();

    let container = SpiceDbContainer::new(SpiceDbConfig::new().with_http(8443)).started()?;

    let grpc_port = container.mapped_port(50051)?;
    let http_port = container.mapped_port(8443)?;
    assert_ne!(grpc_port, http_port);
    assert!(container.endpoint()?.ends_with(&format!(":{grpc_port}")));
    Ok(())
}
