//! # Generic Chart Builders
//!
//! Reusable templates producing the two standard chart shapes: a stateful
//! PostgreSQL database and a node-js shaped HTTP service.
//!
//! Builders are plain values, not a class hierarchy: a concrete chart
//! supplies parameters and never overrides builder behavior. All failures
//! are construction-time; nothing is persisted until the whole tree is
//! serialized at once.

mod database;
mod nodejs;

pub use database::{DatabaseBuilder, DatabaseService};
pub use nodejs::{NodeJsBuilder, NodeJsService};

use crate::config::Configuration;
use crate::constants::{APP_LABEL, DOCKER_CONFIG_SECRET_NAME};
use k8s_openapi::api::core::v1::{LocalObjectReference, ServiceAccount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Pod selector labels of one service
///
/// The `service-name` label is the contract the metrics-scrape registration
/// relies on; it is always attached.
pub(crate) fn selector_labels(service_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), APP_LABEL.to_string()),
        ("service-name".to_string(), service_name.to_string()),
    ])
}

/// Service account with the registry pull secret and no API token
pub(crate) fn service_account(configuration: &Configuration, name: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: configuration.metadata(name),
        image_pull_secrets: Some(vec![LocalObjectReference {
            name: DOCKER_CONFIG_SECRET_NAME.to_string(),
        }]),
        automount_service_account_token: Some(false),
        ..ServiceAccount::default()
    }
}

/// Object metadata carrying both the `app` and the `service-name` label
pub(crate) fn service_metadata(configuration: &Configuration, name: &str) -> ObjectMeta {
    let mut metadata = configuration.metadata(name);
    metadata
        .labels
        .get_or_insert_with(BTreeMap::new)
        .insert("service-name".to_string(), name.to_string());
    metadata
}
