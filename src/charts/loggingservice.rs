//! Logging service chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::{ensure, Result};

#[derive(Debug)]
pub struct LoggingServiceDeps<'a> {
    pub qpiaservice: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub userservice: &'a ServiceHandle,
}

pub fn loggingservice(
    configuration: &Configuration,
    deps: &LoggingServiceDeps<'_>,
) -> Result<NodeJsService> {
    ensure!(
        deps.authserver.name == "authserver",
        "loggingservice expects the auth service to be named authserver, got {}",
        deps.authserver.name
    );

    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "loggingservice", "psa.service.loggingservice")
        .variables(vec![
            ("QPIA_HOST", deps.qpiaservice.host_var()),
            ("QPIA_PORT", deps.qpiaservice.port_var()),
            ("DB_LOG_USER", variables.log_user.clone()),
            ("DB_LOG_PASSWORD", variables.log_password.clone()),
            ("DB_LOG_DB", variables.qpia.db.clone()),
            ("AUTHSERVER_HOST", deps.authserver.host_var()),
            ("AUTHSERVER_PORT", deps.authserver.port_var()),
            (
                "AUTHSERVER_PROBAND_TOKEN_INTROSPECTION_CLIENT_SECRET",
                variables
                    .authserver
                    .proband_token_introspection_client_secret
                    .clone(),
            ),
            (
                "AUTHSERVER_ADMIN_TOKEN_INTROSPECTION_CLIENT_SECRET",
                variables
                    .authserver
                    .admin_token_introspection_client_secret
                    .clone(),
            ),
            ("USERSERVICE_HOST", deps.userservice.host_var()),
            ("USERSERVICE_PORT", deps.userservice.port_var()),
        ])
        .build()
}
