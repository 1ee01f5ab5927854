//! Proptest strategies for container configuration

use proptest::prelude::*;
use testcontainers_spicedb::Feature;

/// Pre-shared keys: visible ASCII without whitespace
pub fn secret_key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.+/=-]{1,64}"
}

/// Non-zero container ports
pub fn port_strategy() -> impl Strategy<Value = u16> {
    1u16..=u16::MAX
}

/// Image references with optional registry host and tag
pub fn image_strategy() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![
            Just(String::new()),
            Just("localhost:5000/".to_string()),
            Just("ghcr.io/".to_string()),
        ],
        "[a-z][a-z0-9]{0,11}/[a-z][a-z0-9-]{0,15}",
        "v[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
    )
        .prop_map(|(registry, repository, tag)| (format!("{registry}{repository}"), tag))
}

pub fn feature_strategy() -> impl Strategy<Value = Feature> {
    prop_oneof![
        ("[a-z]{3,10}", "[a-z]{3,10}:[0-9]{2,5}")
            .prop_map(|(provider, endpoint)| Feature::otel(provider, endpoint)),
        port_strategy().prop_map(Feature::http),
    ]
}

pub fn features_strategy() -> impl Strategy<Value = Vec<Feature>> {
    prop::collection::vec(feature_strategy(), 0..4)
}
