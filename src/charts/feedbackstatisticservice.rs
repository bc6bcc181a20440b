//! Feedback statistic service chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

#[derive(Debug)]
pub struct FeedbackStatisticServiceDeps<'a> {
    pub userservice: &'a ServiceHandle,
    pub qpiaservice: &'a ServiceHandle,
    pub messagequeue: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub questionnaireservice: &'a ServiceHandle,
}

pub fn feedbackstatisticservice(
    configuration: &Configuration,
    deps: &FeedbackStatisticServiceDeps<'_>,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(
        configuration,
        "feedbackstatisticservice",
        "psa.service.feedbackstatisticservice",
    )
    .variables(vec![
        ("QPIA_HOST", deps.qpiaservice.host_var()),
        ("QPIA_PORT", deps.qpiaservice.port_var()),
        ("DB_FEEDBACKSTATISTIC_USER", variables.feedback_statistic_user.clone()),
        (
            "DB_FEEDBACKSTATISTIC_PASSWORD",
            variables.feedback_statistic_password.clone(),
        ),
        ("DB_FEEDBACKSTATISTIC_DB", variables.qpia.db.clone()),
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
        ("QUESTIONNAIRESERVICE_HOST", deps.questionnaireservice.host_var()),
        ("QUESTIONNAIRESERVICE_PORT", deps.questionnaireservice.port_var()),
    ])
    .build()
}
