//! MailHog mail sink chart.
//!
//! The Service is named `mailhog` because the development mail host is
//! referenced under that name by the other services' configuration.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration};
use crate::constants::CONFIG_SECRET_NAME;
use crate::k8s::{Chart, ServiceHandle};
use anyhow::Result;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, KeyToPath, PodSpec, PodTemplateSpec, SecretVolumeSource, Service,
    ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

const SMTP_PORT: i32 = 1025;
const HTTP_PORT: i32 = 8025;

#[derive(Debug)]
pub struct MailServer {
    pub chart: Chart,
    pub service: ServiceHandle,
}

pub fn mailserver(configuration: &Configuration) -> Result<MailServer> {
    let name = configuration.mailhog_host.clone();
    let mut chart = Chart::new("mailserver")?;
    let labels = selector_labels(&name);

    chart.push(&service_account(configuration, &name))?;

    let container = Container {
        name: name.clone(),
        image: Some(configuration.image("psa.server.mailserver")?),
        image_pull_policy: Some("IfNotPresent".to_string()),
        env: Some(env_vars(vec![
            ("MH_AUTH_FILE", "/etc/mailhog/auth".into()),
            ("MH_HOSTNAME", name.clone().into()),
        ])),
        ports: Some(vec![
            ContainerPort {
                container_port: SMTP_PORT,
                name: Some("smtp".to_string()),
                ..ContainerPort::default()
            },
            ContainerPort {
                container_port: HTTP_PORT,
                name: Some("http".to_string()),
                ..ContainerPort::default()
            },
        ]),
        volume_mounts: Some(vec![VolumeMount {
            name: "auth".to_string(),
            mount_path: "/etc/mailhog".to_string(),
            read_only: Some(true),
            ..VolumeMount::default()
        }]),
        security_context: Some(configuration.default_security_context()),
        ..Container::default()
    };

    chart.push(&Deployment {
        metadata: configuration.metadata(&name),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..LabelSelector::default()
            },
            template: PodTemplateSpec {
                metadata: Some(service_metadata(configuration, &name)),
                spec: Some(PodSpec {
                    service_account_name: Some(name.clone()),
                    enable_service_links: Some(false),
                    containers: vec![container],
                    volumes: Some(vec![Volume {
                        name: "auth".to_string(),
                        secret: Some(SecretVolumeSource {
                            secret_name: Some(CONFIG_SECRET_NAME.to_string()),
                            items: Some(vec![KeyToPath {
                                key: "mailhogAuth".to_string(),
                                path: "auth".to_string(),
                                ..KeyToPath::default()
                            }]),
                            ..SecretVolumeSource::default()
                        }),
                        ..Volume::default()
                    }]),
                    ..PodSpec::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    })?;

    chart.push(&Service {
        metadata: configuration.metadata(&name),
        spec: Some(ServiceSpec {
            selector: Some(labels),
            ports: Some(vec![
                ServicePort {
                    name: Some("smtp".to_string()),
                    port: SMTP_PORT,
                    target_port: Some(IntOrString::Int(SMTP_PORT)),
                    ..ServicePort::default()
                },
                ServicePort {
                    name: Some("http".to_string()),
                    port: HTTP_PORT,
                    target_port: Some(IntOrString::Int(HTTP_PORT)),
                    ..ServicePort::default()
                },
            ]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    })?;

    Ok(MailServer {
        chart,
        service: ServiceHandle::new(name, SMTP_PORT),
    })
}
