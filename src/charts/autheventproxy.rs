//! Auth event proxy chart, forwarding keycloak events into the queue.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

pub fn autheventproxy(
    configuration: &Configuration,
    messagequeue: &ServiceHandle,
    authserver: &ServiceHandle,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "autheventproxy", "psa.server.autheventproxy")
        .variables(vec![
            ("MESSAGEQUEUE_HOST", messagequeue.host_var()),
            ("MESSAGEQUEUE_PORT", messagequeue.port_var()),
            ("MESSAGEQUEUE_APP_USER", variables.message_queue.app_user.clone()),
            (
                "MESSAGEQUEUE_APP_PASSWORD",
                variables.message_queue.app_password.clone(),
            ),
            (
                "KEYCLOAK_EVENTS_EXCHANGE",
                variables.authserver.message_queue_exchange.clone(),
            ),
            ("AUTHSERVER_HOST", authserver.host_var()),
            ("AUTHSERVER_PORT", authserver.port_var()),
        ])
        .build()
}
