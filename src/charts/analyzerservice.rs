//! Analyzer service chart, consuming questionnaire events from the queue.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::Result;

pub fn analyzerservice(
    configuration: &Configuration,
    qpiaservice: &ServiceHandle,
    messagequeue: &ServiceHandle,
) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "analyzerservice", "psa.service.analyzerservice")
        .variables(vec![
            ("QPIA_HOST", qpiaservice.host_var()),
            ("QPIA_PORT", qpiaservice.port_var()),
            ("QPIA_USER", variables.qpia.user.clone()),
            ("QPIA_PASSWORD", variables.qpia.password.clone()),
            ("QPIA_DB", variables.qpia.db.clone()),
            ("MESSAGEQUEUE_HOST", messagequeue.host_var()),
            ("MESSAGEQUEUE_PORT", messagequeue.port_var()),
            ("MESSAGEQUEUE_APP_USER", variables.message_queue.app_user.clone()),
            (
                "MESSAGEQUEUE_APP_PASSWORD",
                variables.message_queue.app_password.clone(),
            ),
        ])
        .build()
}
