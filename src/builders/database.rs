//! # Database Builder
//!
//! Produces the standard shape of a PostgreSQL chart: a StatefulSet with
//! exactly one PersistentVolumeClaim template, a single container on port
//! 5432, one Service, and a ServiceAccount.
//!
//! There is no retry or backoff logic anywhere: Kubernetes' own controllers
//! handle restarts, this code only describes desired state once.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration, VarMap};
use crate::constants::POSTGRES_PORT;
use crate::k8s::{validate_kubernetes_name, Chart, ServiceHandle};
use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PersistentVolumeClaim, PersistentVolumeClaimSpec, PodSpec,
    PodTemplateSpec, Service, ServicePort, ServiceSpec, SecurityContext, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// A built database chart and its exposed handle
#[derive(Debug)]
pub struct DatabaseService {
    pub chart: Chart,
    pub service: ServiceHandle,
}

/// Builder for the stateful PostgreSQL chart shape
#[derive(Debug)]
pub struct DatabaseBuilder<'a> {
    configuration: &'a Configuration,
    service_name: String,
    image: String,
    variables: VarMap,
    storage: String,
}

impl<'a> DatabaseBuilder<'a> {
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
            storage: "10Gi".to_string(),
        }
    }

    pub fn variables(mut self, variables: VarMap) -> Self {
        self.variables = variables;
        self
    }

    pub fn build(self) -> Result<DatabaseService> {
        let name = &self.service_name;
        validate_kubernetes_name(name, "database service name")?;

        let image = self
            .configuration
            .image(&self.image)
            .with_context(|| format!("database chart {name}"))?;

        let mut chart = Chart::new(name.clone())?;
        let labels = selector_labels(name);

        let account = service_account(self.configuration, name);
        chart.push(&account)?;

        let container = Container {
            name: name.clone(),
            image: Some(image),
            image_pull_policy: Some("IfNotPresent".to_string()),
            env: Some(env_vars(self.variables)),
            ports: Some(vec![ContainerPort {
                container_port: POSTGRES_PORT,
                name: Some("postgres".to_string()),
                ..ContainerPort::default()
            }]),
            volume_mounts: Some(vec![VolumeMount {
                name: "data".to_string(),
                mount_path: "/var/lib/postgresql/data".to_string(),
                ..VolumeMount::default()
            }]),
            security_context: Some(SecurityContext {
                // postgres writes outside the data volume during startup
                read_only_root_filesystem: Some(false),
                ..self.configuration.default_security_context()
            }),
            ..Container::default()
        };

        let stateful_set = StatefulSet {
            metadata: self.configuration.metadata(name),
            spec: Some(StatefulSetSpec {
                service_name: Some(name.clone()),
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
                        ..PodSpec::default()
                    }),
                },
                volume_claim_templates: Some(vec![PersistentVolumeClaim {
                    metadata: ObjectMeta {
                        name: Some("data".to_string()),
                        labels: Some(self.configuration.labels()),
                        ..ObjectMeta::default()
                    },
                    spec: Some(PersistentVolumeClaimSpec {
                        access_modes: Some(vec!["ReadWriteOnce".to_string()]),
                        storage_class_name: self.configuration.storage_class_name.clone(),
                        resources: Some(VolumeResourceRequirements {
                            requests: Some(BTreeMap::from([(
                                "storage".to_string(),
                                Quantity(self.storage),
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
        };
        chart.push(&stateful_set)?;

        let service = Service {
            metadata: self.configuration.metadata(name),
            spec: Some(ServiceSpec {
                selector: Some(labels),
                ports: Some(vec![ServicePort {
                    name: Some("postgres".to_string()),
                    port: POSTGRES_PORT,
                    target_port: Some(IntOrString::Int(POSTGRES_PORT)),
                    ..ServicePort::default()
                }]),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        };
        chart.push(&service)?;

        Ok(DatabaseService {
            chart,
            service: ServiceHandle::new(name.clone(), POSTGRES_PORT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VarValue;

    #[test]
    fn test_database_chart_shape() {
        let configuration = Configuration::new().unwrap();
        let database = DatabaseBuilder::new(&configuration, "qpiaservice", "psa.database")
            .variables(vec![("POSTGRES_USER", VarValue::from("superuser"))])
            .build()
            .unwrap();

        assert_eq!(database.service, ServiceHandle::new("qpiaservice", 5432));
        // one ServiceAccount, one StatefulSet, one Service
        assert_eq!(database.chart.objects().len(), 3);

        let stateful_set = &database.chart.objects()[1];
        assert_eq!(stateful_set["kind"], "StatefulSet");
        assert_eq!(stateful_set["spec"]["serviceName"], "qpiaservice");
        let claims = stateful_set["spec"]["volumeClaimTemplates"]
            .as_sequence()
            .unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(
            stateful_set["spec"]["template"]["spec"]["containers"][0]["ports"][0]
                ["containerPort"],
            5432
        );
    }

    #[test]
    fn test_database_rejects_unregistered_image() {
        let configuration = Configuration::new().unwrap();
        let result = DatabaseBuilder::new(&configuration, "qpiaservice", "psa.database.unknown")
            .build();
        assert!(result.is_err());
    }
}
