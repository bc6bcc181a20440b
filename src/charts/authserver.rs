//! Keycloak authserver chart.
//!
//! The keycloak image and its event plugin have several names hardcoded, so
//! this chart verifies its collaborators' Service names at construction time.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration};
use crate::constants::NODEJS_PUBLIC_PORT;
use crate::k8s::{Chart, ServiceHandle};
use anyhow::{ensure, Result};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, ResourceRequirements, SecurityContext,
    Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Authserver {
    pub chart: Chart,
    pub service: ServiceHandle,
}

pub fn authserver(
    configuration: &Configuration,
    ipiaservice: &ServiceHandle,
    messagequeue: &ServiceHandle,
) -> Result<Authserver> {
    let name = "authserver";
    // the keycloak event plugin has the queue host hardcoded
    ensure!(
        messagequeue.name == "messagequeue",
        "authserver expects the message queue service to be named messagequeue, got {}",
        messagequeue.name
    );

    let mut chart = Chart::new(name)?;
    let labels = selector_labels(name);

    chart.push(&service_account(configuration, name))?;

    let variables = &configuration.variables;
    let env = env_vars(vec![
        ("KEYCLOAK_ADMIN", "admin".into()),
        ("KEYCLOAK_ADMIN_PASSWORD", variables.authserver_admin_password.clone()),
        ("DB_AUTHSERVER_HOST", ipiaservice.host_var()),
        ("DB_AUTHSERVER_PORT", ipiaservice.port_var()),
        ("DB_AUTHSERVER_USER", variables.authserver_user.clone()),
        ("DB_AUTHSERVER_PASSWORD", variables.authserver_password.clone()),
        ("DB_AUTHSERVER_DB", variables.authserver_db.clone()),
        ("MAIL_HOST", variables.mail.host.clone()),
        ("MAIL_PORT", variables.mail.port.clone()),
        ("MAIL_USER", variables.mail.user.clone()),
        ("MAIL_PASSWORD", variables.mail.password.clone()),
        ("MAIL_REQUIRE_TLS", variables.mail.require_tls.clone()),
        ("MAIL_FROM_ADDRESS", variables.mail.from_address.clone()),
        ("MAIL_FROM_NAME", variables.mail.from_name.clone()),
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
        (
            "AUTHSERVER_PROBAND_TERMS_OF_SERVICE_URL",
            variables.authserver.proband_terms_of_service_url.clone(),
        ),
        (
            "AUTHSERVER_PROBAND_POLICY_URL",
            variables.authserver.proband_policy_url.clone(),
        ),
        ("KK_TO_RMQ_URL", messagequeue.host_var()),
        ("KK_TO_RMQ_PORT", messagequeue.port_var()),
        ("KK_TO_RMQ_USERNAME", variables.message_queue.app_user.clone()),
        ("KK_TO_RMQ_PASSWORD", variables.message_queue.app_password.clone()),
        (
            "KK_TO_RMQ_EXCHANGE",
            variables.authserver.message_queue_exchange.clone(),
        ),
        ("KK_TO_RMQ_VHOST", "/".into()),
        ("WEBAPP_URL", variables.webapp_url.clone()),
        ("EXTERNAL_PROTOCOL", variables.external_protocol.clone()),
        ("EXTERNAL_PORT", variables.external_port.clone()),
        ("EXTERNAL_HOST", variables.external_host.clone()),
        ("IS_DEVELOPMENT_SYSTEM", variables.is_development_system.clone()),
        (
            "IS_DIRECT_ACCESS_GRANT_ENABLED",
            variables.is_development_system.clone(),
        ),
        ("USER_PASSWORD_LENGTH", variables.user_password_length.clone()),
    ]);

    let container = Container {
        name: name.to_string(),
        image: Some(configuration.image("psa.server.auth")?),
        image_pull_policy: Some("IfNotPresent".to_string()),
        env: Some(env),
        ports: Some(vec![ContainerPort {
            container_port: NODEJS_PUBLIC_PORT,
            name: Some("http".to_string()),
            ..ContainerPort::default()
        }]),
        security_context: Some(SecurityContext {
            // keycloak writes to /opt/keycloak/lib/quarkus/
            read_only_root_filesystem: Some(false),
            ..configuration.default_security_context()
        }),
        resources: Some(ResourceRequirements {
            requests: Some(BTreeMap::from([
                ("cpu".to_string(), Quantity("1".to_string())),
                ("memory".to_string(), Quantity("512Mi".to_string())),
            ])),
            limits: Some(BTreeMap::from([
                ("cpu".to_string(), Quantity("4".to_string())),
                ("memory".to_string(), Quantity("4Gi".to_string())),
            ])),
            ..ResourceRequirements::default()
        }),
        ..Container::default()
    };

    chart.push(&Deployment {
        metadata: configuration.metadata(name),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            // keycloak must not run twice against the same schema
            strategy: Some(DeploymentStrategy {
                type_: Some("Recreate".to_string()),
                ..DeploymentStrategy::default()
            }),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..LabelSelector::default()
            },
            template: PodTemplateSpec {
                metadata: Some(service_metadata(configuration, name)),
                spec: Some(PodSpec {
                    service_account_name: Some(name.to_string()),
                    enable_service_links: Some(false),
                    containers: vec![container],
                    ..PodSpec::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    })?;

    chart.push(&Service {
        metadata: configuration.metadata(name),
        spec: Some(ServiceSpec {
            selector: Some(labels),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: NODEJS_PUBLIC_PORT,
                target_port: Some(IntOrString::Int(NODEJS_PUBLIC_PORT)),
                ..ServicePort::default()
            }]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    })?;

    Ok(Authserver {
        chart,
        service: ServiceHandle::new(name, NODEJS_PUBLIC_PORT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authserver_rejects_a_renamed_message_queue() {
        let configuration = Configuration::new().unwrap();
        let ipia = ServiceHandle::new("ipiaservice", 5432);
        let queue = ServiceHandle::new("renamed-queue", 5672);
        assert!(authserver(&configuration, &ipia, &queue).is_err());
    }

    #[test]
    fn test_authserver_keeps_a_writable_root_filesystem() {
        let configuration = Configuration::new().unwrap();
        let ipia = ServiceHandle::new("ipiaservice", 5432);
        let queue = ServiceHandle::new("messagequeue", 5672);
        let authserver = authserver(&configuration, &ipia, &queue).unwrap();
        let container =
            &authserver.chart.objects()[1]["spec"]["template"]["spec"]["containers"][0];
        assert_eq!(
            container["securityContext"]["readOnlyRootFilesystem"],
            false
        );
        assert_eq!(container["securityContext"]["runAsNonRoot"], true);
    }
}
