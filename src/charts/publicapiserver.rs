//! Public API server chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

pub fn publicapiserver(
    configuration: &Configuration,
    authserver: &ServiceHandle,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "publicapiserver", "psa.server.publicapi")
        .variables(vec![
            ("AUTHSERVER_HOST", authserver.host_var()),
            ("AUTHSERVER_PORT", authserver.port_var()),
            (
                "AUTHSERVER_ADMIN_TOKEN_INTROSPECTION_CLIENT_SECRET",
                variables
                    .authserver
                    .admin_token_introspection_client_secret
                    .clone(),
            ),
            (
                "AUTHSERVER_ADMIN_MANAGEMENT_CLIENT_SECRET",
                variables.authserver.admin_management_client_secret.clone(),
            ),
            ("WEBAPP_URL", variables.webapp_url.clone()),
        ])
        .build()
}
