//! # Node-JS Service Builder
//!
//! Produces the standard shape of a node-js shaped microservice chart: a
//! Deployment exposing a public port (4000) and an internal port (5000) as
//! two separate Services, HTTP readiness/liveness probes unless disabled,
//! resource requests/limits, a ServiceAccount, and a metrics-scrape
//! registration.
//!
//! Guarantees: the internal Service is always named `internal-<serviceName>`,
//! and the `service-name` label is always attached so the ServiceMonitor
//! selector can find the Service.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration, VarMap};
use crate::constants::{NODEJS_INTERNAL_PORT, NODEJS_PUBLIC_PORT};
use crate::k8s::{validate_kubernetes_name, Chart, ServiceHandle, ServiceMonitor};
use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HTTPGetAction, PodSpec, PodTemplateSpec, Probe,
    ResourceRequirements, SecretVolumeSource, SecurityContext, Service, ServicePort, ServiceSpec,
    Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// A built node-js service chart and its exposed handles
#[derive(Debug)]
pub struct NodeJsService {
    pub chart: Chart,
    pub service: ServiceHandle,
    pub internal_service: ServiceHandle,
}

/// Builder for the node-js shaped chart
#[derive(Debug)]
pub struct NodeJsBuilder<'a> {
    configuration: &'a Configuration,
    service_name: String,
    image: String,
    variables: VarMap,
    probes: bool,
    read_only_root_filesystem: bool,
    secret_mounts: Vec<(String, String)>,
}

impl<'a> NodeJsBuilder<'a> {
    pub fn new(
        configuration: &'a Configuration,
        service_name: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            configuration,
            service_name: service_name.into(),
            image: image.into(),
            variables: Vec::new(),
            probes: true,
            read_only_root_filesystem: true,
            secret_mounts: Vec::new(),
        }
    }

    pub fn variables(mut self, variables: VarMap) -> Self {
        self.variables = variables;
        self
    }

    /// Disable the HTTP health probes, for images without a health endpoint
    pub fn without_probes(mut self) -> Self {
        self.probes = false;
        self
    }

    /// Opt out of the read-only root filesystem, for images that write to it
    pub fn writable_root_filesystem(mut self) -> Self {
        self.read_only_root_filesystem = false;
        self
    }

    /// Mount a secret's keys as read-only files below the given path
    pub fn mount_secret(mut self, secret: impl Into<String>, path: impl Into<String>) -> Self {
        self.secret_mounts.push((secret.into(), path.into()));
        self
    }

    fn probe(path: &str) -> Probe {
        Probe {
            http_get: Some(HTTPGetAction {
                path: Some(path.to_string()),
                port: IntOrString::Int(NODEJS_PUBLIC_PORT),
                ..HTTPGetAction::default()
            }),
            initial_delay_seconds: Some(10),
            period_seconds: Some(30),
            ..Probe::default()
        }
    }

    pub fn build(self) -> Result<NodeJsService> {
        let name = &self.service_name;
        validate_kubernetes_name(name, "service name")?;

        let image = self
            .configuration
            .image(&self.image)
            .with_context(|| format!("service chart {name}"))?;

        let mut chart = Chart::new(name.clone())?;
        let labels = selector_labels(name);

        let account = service_account(self.configuration, name);
        chart.push(&account)?;

        let mut volumes = Vec::new();
        let mut volume_mounts = Vec::new();
        for (index, (secret, mount_path)) in self.secret_mounts.iter().enumerate() {
            let volume_name = format!("secret-{index}");
            volumes.push(Volume {
                name: volume_name.clone(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(secret.clone()),
                    ..SecretVolumeSource::default()
                }),
                ..Volume::default()
            });
            volume_mounts.push(VolumeMount {
                name: volume_name,
                mount_path: mount_path.clone(),
                read_only: Some(true),
                ..VolumeMount::default()
            });
        }

        let container = Container {
            name: name.clone(),
            image: Some(image),
            image_pull_policy: Some("IfNotPresent".to_string()),
            env: Some(env_vars(self.variables)),
            ports: Some(vec![
                ContainerPort {
                    container_port: NODEJS_PUBLIC_PORT,
                    name: Some("http".to_string()),
                    ..ContainerPort::default()
                },
                ContainerPort {
                    container_port: NODEJS_INTERNAL_PORT,
                    name: Some("http-internal".to_string()),
                    ..ContainerPort::default()
                },
            ]),
            readiness_probe: self.probes.then(|| Self::probe("/health")),
            liveness_probe: self.probes.then(|| Self::probe("/health")),
            security_context: Some(SecurityContext {
                read_only_root_filesystem: Some(self.read_only_root_filesystem),
                ..self.configuration.default_security_context()
            }),
            resources: Some(ResourceRequirements {
                requests: Some(BTreeMap::from([
                    ("cpu".to_string(), Quantity("100m".to_string())),
                    ("memory".to_string(), Quantity("256Mi".to_string())),
                ])),
                limits: Some(BTreeMap::from([
                    ("cpu".to_string(), Quantity("500m".to_string())),
                    ("memory".to_string(), Quantity("512Mi".to_string())),
                ])),
                ..ResourceRequirements::default()
            }),
            volume_mounts: (!volume_mounts.is_empty()).then_some(volume_mounts),
            ..Container::default()
        };

        let deployment = Deployment {
            metadata: self.configuration.metadata(name),
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..LabelSelector::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(service_metadata(self.configuration, name)),
                    spec: Some(PodSpec {
                        service_account_name: Some(name.clone()),
                        enable_service_links: Some(false),
                        containers: vec![container],
                        volumes: (!volumes.is_empty()).then_some(volumes),
                        ..PodSpec::default()
                    }),
                },
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        };
        chart.push(&deployment)?;

        let public_service = Service {
            metadata: service_metadata(self.configuration, name),
            spec: Some(ServiceSpec {
                selector: Some(labels.clone()),
                ports: Some(vec![ServicePort {
                    name: Some("http".to_string()),
                    port: NODEJS_PUBLIC_PORT,
                    target_port: Some(IntOrString::Int(NODEJS_PUBLIC_PORT)),
                    ..ServicePort::default()
                }]),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        };
        chart.push(&public_service)?;

        let internal_name = format!("internal-{name}");
        let internal_service = Service {
            metadata: self.configuration.metadata(&internal_name),
            spec: Some(ServiceSpec {
                selector: Some(labels),
                ports: Some(vec![ServicePort {
                    name: Some("http-internal".to_string()),
                    port: NODEJS_INTERNAL_PORT,
                    target_port: Some(IntOrString::Int(NODEJS_INTERNAL_PORT)),
                    ..ServicePort::default()
                }]),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        };
        chart.push(&internal_service)?;

        let monitor = ServiceMonitor::new(self.configuration.metadata(name), name, "http");
        chart.push(&monitor)?;

        Ok(NodeJsService {
            chart,
            service: ServiceHandle::new(name.clone(), NODEJS_PUBLIC_PORT),
            internal_service: ServiceHandle::new(internal_name, NODEJS_INTERNAL_PORT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VarValue;

    fn build(service_name: &str, image: &str) -> Result<NodeJsService> {
        let configuration = Configuration::new().unwrap();
        NodeJsBuilder::new(&configuration, service_name, image)
            .variables(vec![("WEBAPP_URL", VarValue::from("https://pia-app"))])
            .build()
    }

    #[test]
    fn test_nodejs_chart_shape() {
        let service = build("userservice", "psa.service.userservice").unwrap();

        assert_eq!(service.service, ServiceHandle::new("userservice", 4000));
        assert_eq!(
            service.internal_service,
            ServiceHandle::new("internal-userservice", 5000)
        );
        // ServiceAccount, Deployment, two Services, ServiceMonitor
        assert_eq!(service.chart.objects().len(), 5);

        let internal = &service.chart.objects()[3];
        assert_eq!(internal["kind"], "Service");
        assert_eq!(internal["metadata"]["name"], "internal-userservice");
        assert_eq!(internal["spec"]["ports"][0]["port"], 5000);
    }

    #[test]
    fn test_nodejs_pods_carry_the_service_name_label() {
        let service = build("userservice", "psa.service.userservice").unwrap();
        let deployment = &service.chart.objects()[1];
        assert_eq!(
            deployment["spec"]["template"]["metadata"]["labels"]["service-name"],
            "userservice"
        );

        let monitor = &service.chart.objects()[4];
        assert_eq!(monitor["kind"], "ServiceMonitor");
        assert_eq!(
            monitor["spec"]["selector"]["matchLabels"]["service-name"],
            "userservice"
        );
    }

    #[test]
    fn test_probes_can_be_disabled() {
        let configuration = Configuration::new().unwrap();
        let service = NodeJsBuilder::new(&configuration, "modysservice", "psa.service.modysservice")
            .without_probes()
            .build()
            .unwrap();
        let container =
            &service.chart.objects()[1]["spec"]["template"]["spec"]["containers"][0];
        assert!(container.get("readinessProbe").is_none());
        assert!(container.get("livenessProbe").is_none());
    }

    #[test]
    fn test_secret_mounts_become_read_only_volumes() {
        let configuration = Configuration::new().unwrap();
        let service = NodeJsBuilder::new(&configuration, "userservice", "psa.service.userservice")
            .mount_secret("pia-config", "/etc/config")
            .build()
            .unwrap();

        let pod = &service.chart.objects()[1]["spec"]["template"]["spec"];
        assert_eq!(pod["volumes"][0]["secret"]["secretName"], "pia-config");
        let mount = &pod["containers"][0]["volumeMounts"][0];
        assert_eq!(mount["mountPath"], "/etc/config");
        assert_eq!(mount["readOnly"], true);
    }

    #[test]
    fn test_unregistered_image_fails_the_build() {
        assert!(build("userservice", "psa.service.nope").is_err());
    }
}
