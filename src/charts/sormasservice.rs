//! SORMAS connector service chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

#[derive(Debug)]
pub struct SormasServiceDeps<'a> {
    pub userservice: &'a ServiceHandle,
    pub qpiaservice: &'a ServiceHandle,
    pub messagequeue: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub personaldataservice: &'a ServiceHandle,
    pub questionnaireservice: &'a ServiceHandle,
}

pub fn sormasservice(
    configuration: &Configuration,
    deps: &SormasServiceDeps<'_>,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "sormasservice", "psa.service.sormasservice")
        .variables(vec![
            ("QPIA_HOST", deps.qpiaservice.host_var()),
            ("QPIA_PORT", deps.qpiaservice.port_var()),
            ("DB_SORMAS_USER", variables.sormas_user.clone()),
            ("DB_SORMAS_PASSWORD", variables.sormas_password.clone()),
            ("DB_SORMAS_DB", variables.qpia.db.clone()),
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
            ("PERSONALDATASERVICE_HOST", deps.personaldataservice.host_var()),
            ("PERSONALDATASERVICE_PORT", deps.personaldataservice.port_var()),
            ("QUESTIONNAIRESERVICE_HOST", deps.questionnaireservice.host_var()),
            ("QUESTIONNAIRESERVICE_PORT", deps.questionnaireservice.port_var()),
            ("IS_SORMAS_ENABLED", variables.is_sormas_enabled.clone()),
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
