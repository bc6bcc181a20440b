//! User service chart.
//!
//! Sits inside both dependency cycles: the logging and personal-data handles
//! it receives are pre-declared contracts, not handles of constructed charts.
//! The assembly verifies them against the real charts afterwards.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use crate::k8s::ServiceHandle;
use anyhow::{ensure, Result};

#[derive(Debug)]
pub struct UserServiceDeps<'a> {
    pub messagequeue: &'a ServiceHandle,
    pub qpiaservice: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub loggingservice: &'a ServiceHandle,
    pub personaldataservice: &'a ServiceHandle,
}

pub fn userservice(
    configuration: &Configuration,
    deps: &UserServiceDeps<'_>,
) -> Result<NodeJsService> {
    // the keycloak realm export has this hostname hardcoded
    ensure!(
        deps.authserver.name == "authserver",
        "userservice expects the auth service to be named authserver, got {}",
        deps.authserver.name
    );

    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "userservice", "psa.service.userservice")
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
                "AUTHSERVER_PROBAND_MANAGEMENT_CLIENT_SECRET",
                variables.authserver.proband_management_client_secret.clone(),
            ),
            (
                "AUTHSERVER_ADMIN_MANAGEMENT_CLIENT_SECRET",
                variables.authserver.admin_management_client_secret.clone(),
            ),
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
            ("PERSONALDATASERVICE_HOST", deps.personaldataservice.host_var()),
            ("PERSONALDATASERVICE_PORT", deps.personaldataservice.port_var()),
            ("WEBAPP_URL", variables.webapp_url.clone()),
            ("USER_PASSWORD_LENGTH", variables.user_password_length.clone()),
            ("IS_DEVELOPMENT_SYSTEM", variables.is_development_system.clone()),
        ])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_userservice_rejects_a_renamed_authserver() {
        let configuration = Configuration::new().unwrap();
        let deps = UserServiceDeps {
            messagequeue: &ServiceHandle::new("messagequeue", 5672),
            qpiaservice: &ServiceHandle::new("qpiaservice", 5432),
            authserver: &ServiceHandle::new("keycloak", 4000),
            loggingservice: &ServiceHandle::internal("loggingservice"),
            personaldataservice: &ServiceHandle::internal("personaldataservice"),
        };
        assert!(userservice(&configuration, &deps).is_err());
    }
}
