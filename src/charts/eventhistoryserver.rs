//! Event history server chart.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

pub fn eventhistoryserver(
    configuration: &Configuration,
    authserver: &ServiceHandle,
    qpiaservice: &ServiceHandle,
    messagequeue: &ServiceHandle,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "eventhistoryserver", "psa.server.eventhistory")
        .variables(vec![
            ("QPIA_HOST", qpiaservice.host_var()),
            ("QPIA_PORT", qpiaservice.port_var()),
            ("DB_EVENTHISTORY_USER", variables.event_history_user.clone()),
            ("DB_EVENTHISTORY_PASSWORD", variables.event_history_password.clone()),
            ("DB_EVENTHISTORY_DB", variables.qpia.db.clone()),
            ("MESSAGEQUEUE_HOST", messagequeue.host_var()),
            ("MESSAGEQUEUE_PORT", messagequeue.port_var()),
            ("MESSAGEQUEUE_APP_USER", variables.message_queue.app_user.clone()),
            (
                "MESSAGEQUEUE_APP_PASSWORD",
                variables.message_queue.app_password.clone(),
            ),
            ("AUTHSERVER_HOST", authserver.host_var()),
            ("AUTHSERVER_PORT", authserver.port_var()),
            (
                "AUTHSERVER_ADMIN_TOKEN_INTROSPECTION_CLIENT_SECRET",
                variables
                    .authserver
                    .admin_token_introspection_client_secret
                    .clone(),
            ),
        ])
        .build()
}
