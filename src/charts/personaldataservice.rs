//! Personal data service chart.
//!
//! Part of the second dependency cycle with the user service; the assembly
//! verifies the pre-declared contract against the handle built here.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::{ensure, Result};

#[derive(Debug)]
pub struct PersonaldataServiceDeps<'a> {
    pub ipiaservice: &'a ServiceHandle,
    pub messagequeue: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub loggingservice: &'a ServiceHandle,
    pub userservice: &'a ServiceHandle,
}

pub fn personaldataservice(
    configuration: &Configuration,
    deps: &PersonaldataServiceDeps<'_>,
) -> Result<NodeJsService> {
    ensure!(
        deps.authserver.name == "authserver",
        "personaldataservice expects the auth service to be named authserver, got {}",
        deps.authserver.name
    );

    let variables = &configuration.variables;
    NodeJsBuilder::new(
        configuration,
        "personaldataservice",
        "psa.service.personaldataservice",
    )
    .variables(vec![
        ("IPIA_HOST", deps.ipiaservice.host_var()),
        ("IPIA_PORT", deps.ipiaservice.port_var()),
        ("DB_PERSONALDATA_USER", variables.personaldata_user.clone()),
        ("DB_PERSONALDATA_PASSWORD", variables.personaldata_password.clone()),
        ("DB_PERSONALDATA_DB", variables.ipia.db.clone()),
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
        ("LOGGINGSERVICE_HOST", deps.loggingservice.host_var()),
        ("LOGGINGSERVICE_PORT", deps.loggingservice.port_var()),
        ("USERSERVICE_HOST", deps.userservice.host_var()),
        ("USERSERVICE_PORT", deps.userservice.port_var()),
        ("MAIL_HOST", variables.mail.host.clone()),
        ("MAIL_PORT", variables.mail.port.clone()),
        ("MAIL_USER", variables.mail.user.clone()),
        ("MAIL_PASSWORD", variables.mail.password.clone()),
        ("MAIL_REQUIRE_TLS", variables.mail.require_tls.clone()),
        ("MAIL_FROM_ADDRESS", variables.mail.from_address.clone()),
        ("MAIL_FROM_NAME", variables.mail.from_name.clone()),
        ("WEBAPP_URL", variables.webapp_url.clone()),
    ])
    .build()
}
