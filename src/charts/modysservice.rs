//! MODYS import service chart.
//!
//! A pure poller without an HTTP surface of its own, so the health probes
//! are disabled.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

pub fn modysservice(
    configuration: &Configuration,
    userservice: &ServiceHandle,
    personaldataservice: &ServiceHandle,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "modysservice", "psa.service.modysservice")
        .variables(vec![
            ("MODYS_BASE_URL", variables.modys.base_url.clone()),
            ("MODYS_USERNAME", variables.modys.user_name.clone()),
            ("MODYS_PASSWORD", variables.modys.password.clone()),
            ("MODYS_STUDY", variables.modys.study.clone()),
            ("MODYS_IDENTIFIER_TYPE_ID", variables.modys.identifier_type_id.clone()),
            (
                "MODYS_REQUEST_CONCURRENCY",
                variables.modys.request_concurrency.clone(),
            ),
            ("USERSERVICE_HOST", userservice.host_var()),
            ("USERSERVICE_PORT", userservice.port_var()),
            ("PERSONALDATASERVICE_HOST", personaldataservice.host_var()),
            ("PERSONALDATASERVICE_PORT", personaldataservice.port_var()),
        ])
        .without_probes()
        .build()
}
