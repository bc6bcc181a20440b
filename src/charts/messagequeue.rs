//! RabbitMQ message queue chart.
//!
//! StatefulSet rather than Deployment: the queue keeps its mnesia state on a
//! PersistentVolumeClaim so unacknowledged messages survive a restart.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration};
use crate::constants::{AMQP_MANAGEMENT_PORT, AMQP_PORT};
use crate::k8s::{Chart, ServiceHandle};
use anyhow::Result;
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PersistentVolumeClaim, PersistentVolumeClaimSpec, PodSpec,
    PodTemplateSpec, SecurityContext, Service, ServicePort, ServiceSpec, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct MessageQueue {
    pub chart: Chart,
    pub service: ServiceHandle,
}

pub fn messagequeue(configuration: &Configuration) -> Result<MessageQueue> {
    let name = "messagequeue";
    let mut chart = Chart::new(name)?;
    let labels = selector_labels(name);

    chart.push(&service_account(configuration, name))?;

    let variables = &configuration.variables.message_queue;
    let container = Container {
        name: name.to_string(),
        image: Some(configuration.image("psa.server.messagequeue")?),
        image_pull_policy: Some("IfNotPresent".to_string()),
        env: Some(env_vars(vec![
            ("RABBITMQ_DEFAULT_USER", "admin".into()),
            ("RABBITMQ_DEFAULT_PASS", variables.admin_password.clone()),
            ("MESSAGEQUEUE_APP_USER", variables.app_user.clone()),
            ("MESSAGEQUEUE_APP_PASSWORD", variables.app_password.clone()),
        ])),
        ports: Some(vec![
            ContainerPort {
                container_port: AMQP_PORT,
                name: Some("amqp".to_string()),
                ..ContainerPort::default()
            },
            ContainerPort {
                container_port: AMQP_MANAGEMENT_PORT,
                name: Some("management".to_string()),
                ..ContainerPort::default()
            },
        ]),
        volume_mounts: Some(vec![VolumeMount {
            name: "data".to_string(),
            mount_path: "/var/lib/rabbitmq".to_string(),
            ..VolumeMount::default()
        }]),
        security_context: Some(SecurityContext {
            // rabbitmq writes its config and erlang cookie on startup
            read_only_root_filesystem: Some(false),
            ..configuration.default_security_context()
        }),
        ..Container::default()
    };

    chart.push(&StatefulSet {
        metadata: configuration.metadata(name),
        spec: Some(StatefulSetSpec {
            service_name: Some(name.to_string()),
            replicas: Some(1),
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
            volume_claim_templates: Some(vec![PersistentVolumeClaim {
                metadata: ObjectMeta {
                    name: Some("data".to_string()),
                    labels: Some(configuration.labels()),
                    ..ObjectMeta::default()
                },
                spec: Some(PersistentVolumeClaimSpec {
                    access_modes: Some(vec!["ReadWriteOnce".to_string()]),
                    storage_class_name: configuration.storage_class_name.clone(),
                    resources: Some(VolumeResourceRequirements {
                        requests: Some(BTreeMap::from([(
                            "storage".to_string(),
                            Quantity("5Gi".to_string()),
                        )])),
                        ..VolumeResourceRequirements::default()
                    }),
                    ..PersistentVolumeClaimSpec::default()
                }),
                ..PersistentVolumeClaim::default()
            }]),
            ..StatefulSetSpec::default()
        }),
        ..StatefulSet::default()
    })?;

    chart.push(&Service {
        metadata: configuration.metadata(name),
        spec: Some(ServiceSpec {
            selector: Some(labels),
            ports: Some(vec![
                ServicePort {
                    name: Some("amqp".to_string()),
                    port: AMQP_PORT,
                    target_port: Some(IntOrString::Int(AMQP_PORT)),
                    ..ServicePort::default()
                },
                ServicePort {
                    name: Some("management".to_string()),
                    port: AMQP_MANAGEMENT_PORT,
                    target_port: Some(IntOrString::Int(AMQP_MANAGEMENT_PORT)),
                    ..ServicePort::default()
                },
            ]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    })?;

    Ok(MessageQueue {
        chart,
        service: ServiceHandle::new(name, AMQP_PORT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messagequeue_is_a_stateful_set_on_port_5672() {
        let configuration = Configuration::new().unwrap();
        let queue = messagequeue(&configuration).unwrap();
        assert_eq!(queue.service, ServiceHandle::new("messagequeue", 5672));

        let stateful_set = &queue.chart.objects()[1];
        assert_eq!(stateful_set["kind"], "StatefulSet");
        assert_eq!(stateful_set["metadata"]["name"], "messagequeue");
        assert_eq!(stateful_set["spec"]["serviceName"], "messagequeue");
        assert_eq!(
            stateful_set["spec"]["template"]["spec"]["containers"][0]["ports"][0]
                ["containerPort"],
            5672
        );
    }
}
