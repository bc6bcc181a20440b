//! Questionnaire service chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

#[derive(Debug)]
pub struct QuestionnaireServiceDeps<'a> {
    pub userservice: &'a ServiceHandle,
    pub qpiaservice: &'a ServiceHandle,
    pub complianceservice: &'a ServiceHandle,
    pub sampletrackingservice: &'a ServiceHandle,
    pub loggingservice: &'a ServiceHandle,
    pub messagequeue: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
}

pub fn questionnaireservice(
    configuration: &Configuration,
    deps: &QuestionnaireServiceDeps<'_>,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(
        configuration,
        "questionnaireservice",
        "psa.service.questionnaireservice",
    )
    .variables(vec![
        ("QPIA_HOST", deps.qpiaservice.host_var()),
        ("QPIA_PORT", deps.qpiaservice.port_var()),
        ("QPIA_USER", variables.qpia.user.clone()),
        ("QPIA_PASSWORD", variables.qpia.password.clone()),
        ("QPIA_DB", variables.qpia.db.clone()),
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
        ("COMPLIANCESERVICE_HOST", deps.complianceservice.host_var()),
        ("COMPLIANCESERVICE_PORT", deps.complianceservice.port_var()),
        ("SAMPLETRACKINGSERVICE_HOST", deps.sampletrackingservice.host_var()),
        ("SAMPLETRACKINGSERVICE_PORT", deps.sampletrackingservice.port_var()),
        ("LOGGINGSERVICE_HOST", deps.loggingservice.host_var()),
        ("LOGGINGSERVICE_PORT", deps.loggingservice.port_var()),
        ("WEBAPP_URL", variables.webapp_url.clone()),
        ("DEFAULT_LANGUAGE", variables.default_language.clone()),
    ])
    .build()
}
