//! Compliance (consent management) service chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

#[derive(Debug)]
pub struct ComplianceServiceDeps<'a> {
    pub userservice: &'a ServiceHandle,
    pub ewpiaservice: &'a ServiceHandle,
    pub messagequeue: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
}

pub fn complianceservice(
    configuration: &Configuration,
    deps: &ComplianceServiceDeps<'_>,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(
        configuration,
        "complianceservice",
        "psa.service.complianceservice",
    )
    .variables(vec![
        ("EWPIA_HOST", deps.ewpiaservice.host_var()),
        ("EWPIA_PORT", deps.ewpiaservice.port_var()),
        ("EWPIA_USER", variables.ewpia.user.clone()),
        ("EWPIA_PASSWORD", variables.ewpia.password.clone()),
        ("EWPIA_DB", variables.ewpia.db.clone()),
        ("MESSAGEQUEUE_HOST", deps.messagequeue.host_var()),
        ("MESSAGEQUEUE_PORT", deps.messagequeue.port_var()),
        ("MESSAGEQUEUE_APP_USER", variables.message_queue.app_user.clone()),
        (
            "MESSAGEQUEUE_APP_PASSWORD",
            variables.message_queue.app_password.clone(),
        ),
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
        ("DEFAULT_LANGUAGE", variables.default_language.clone()),
    ])
    .build()
}
