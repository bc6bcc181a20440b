//! API gateway chart: the single external entry point.
//!
//! Routing names are hardcoded inside the gateway image, so every upstream
//! Service name is verified here before any object is built. Naming is a
//! cross-service contract enforced only by these checks, not by type.

use crate::builders::{selector_labels, service_account, service_metadata};
use crate::config::{env_vars, Configuration};
use crate::constants::INGRESS_TLS_SECRET_NAME;
use crate::k8s::{Chart, ServiceHandle};
use anyhow::{ensure, Result};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EmptyDirVolumeSource, PodSpec, PodTemplateSpec,
    ResourceRequirements, SecurityContext, Service, ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

const HTTP_PORT: i32 = 80;

#[derive(Debug)]
pub struct ApiGatewayDeps<'a> {
    pub webappserver: &'a ServiceHandle,
    pub authserver: &'a ServiceHandle,
    pub userservice: &'a ServiceHandle,
    pub loggingservice: &'a ServiceHandle,
    pub personaldataservice: &'a ServiceHandle,
    pub modysservice: &'a ServiceHandle,
    pub complianceservice: &'a ServiceHandle,
    pub questionnaireservice: &'a ServiceHandle,
    pub analyzerservice: &'a ServiceHandle,
    pub notificationservice: &'a ServiceHandle,
    pub sampletrackingservice: &'a ServiceHandle,
    pub feedbackstatisticservice: &'a ServiceHandle,
    pub sormasservice: &'a ServiceHandle,
    pub publicapiserver: &'a ServiceHandle,
    pub eventhistoryserver: &'a ServiceHandle,
}

impl ApiGatewayDeps<'_> {
    /// Verify the routing names the gateway image has hardcoded
    fn check_routing_names(&self) -> Result<()> {
        let expected = [
            (self.webappserver, "webappserver"),
            (self.authserver, "authserver"),
            (self.userservice, "userservice"),
            (self.loggingservice, "loggingservice"),
            (self.personaldataservice, "personaldataservice"),
            (self.modysservice, "modysservice"),
            (self.complianceservice, "complianceservice"),
            (self.questionnaireservice, "questionnaireservice"),
            (self.analyzerservice, "analyzerservice"),
            (self.notificationservice, "notificationservice"),
            (self.sampletrackingservice, "sampletrackingservice"),
            (self.feedbackstatisticservice, "feedbackstatisticservice"),
            (self.sormasservice, "sormasservice"),
            (self.publicapiserver, "publicapiserver"),
            (self.eventhistoryserver, "eventhistoryserver"),
        ];
        for (handle, name) in expected {
            ensure!(
                handle.name == name,
                "apigateway routes to the hardcoded service name {name}, got {}",
                handle.name
            );
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ApiGateway {
    pub chart: Chart,
    pub service: ServiceHandle,
}

pub fn apigateway(configuration: &Configuration, deps: &ApiGatewayDeps<'_>) -> Result<ApiGateway> {
    let name = "apigateway";
    deps.check_routing_names()?;

    let mut chart = Chart::new(name)?;
    let labels = selector_labels(name);

    chart.push(&service_account(configuration, name))?;

    let variables = &configuration.variables;
    let env = env_vars(vec![
        // unused by the gateway itself, kept for the generated nginx config
        ("WEBAPPSERVER_HTTP_PORT", HTTP_PORT.into()),
        ("USERSERVICE_PORT", deps.userservice.port_var()),
        ("QUESTIONNAIRESERVICE_PORT", deps.questionnaireservice.port_var()),
        ("NOTIFICATIONSERVICE_PORT", deps.notificationservice.port_var()),
        ("SAMPLETRACKINGSERVICE_PORT", deps.sampletrackingservice.port_var()),
        ("PERSONALDATASERVICE_PORT", deps.personaldataservice.port_var()),
        ("LOGGINGSERVICE_PORT", deps.loggingservice.port_var()),
        ("MODYSSERVICE_PORT", deps.modysservice.port_var()),
        ("COMPLIANCESERVICE_PORT", deps.complianceservice.port_var()),
        ("ANALYZERSERVICE_PORT", deps.analyzerservice.port_var()),
        ("SORMASSERVICE_PORT", deps.sormasservice.port_var()),
        (
            "FEEDBACKSTATISTICSERVICE_PORT",
            deps.feedbackstatisticservice.port_var(),
        ),
        ("AUTHSERVER_PORT", deps.authserver.port_var()),
        ("PUBLICAPISERVER_PORT", deps.publicapiserver.port_var()),
        ("EVENTHISTORYSERVER_PORT", deps.eventhistoryserver.port_var()),
        ("X_FRAME_OPTIONS", variables.x_frame_options.clone()),
        ("CONTENT_SECURITY_POLICY", variables.content_security_policy.clone()),
        ("IS_DEVELOPMENT_SYSTEM", variables.is_development_system.clone()),
        ("EXTERNAL_PROTOCOL", "http".into()),
        ("EXTERNAL_PORT", HTTP_PORT.into()),
    ]);

    let container = Container {
        name: name.to_string(),
        image: Some(configuration.image("psa.server.apigateway")?),
        image_pull_policy: Some("IfNotPresent".to_string()),
        env: Some(env),
        ports: Some(vec![ContainerPort {
            container_port: HTTP_PORT,
            name: Some("http".to_string()),
            ..ContainerPort::default()
        }]),
        security_context: Some(SecurityContext {
            run_as_user: Some(1000),
            run_as_group: Some(1000),
            ..configuration.default_security_context()
        }),
        resources: Some(ResourceRequirements {
            requests: Some(BTreeMap::from([
                ("cpu".to_string(), Quantity("1".to_string())),
                ("memory".to_string(), Quantity("512Mi".to_string())),
            ])),
            limits: Some(BTreeMap::from([
                ("cpu".to_string(), Quantity("2".to_string())),
                ("memory".to_string(), Quantity("1Gi".to_string())),
            ])),
            ..ResourceRequirements::default()
        }),
        volume_mounts: Some(vec![VolumeMount {
            name: "npm-dir".to_string(),
            mount_path: "/home/node/.npm".to_string(),
            ..VolumeMount::default()
        }]),
        ..Container::default()
    };

    chart.push(&Deployment {
        metadata: configuration.metadata(name),
        spec: Some(DeploymentSpec {
            replicas: Some(2),
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
                    volumes: Some(vec![Volume {
                        name: "npm-dir".to_string(),
                        empty_dir: Some(EmptyDirVolumeSource::default()),
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
        metadata: configuration.metadata(name),
        spec: Some(ServiceSpec {
            selector: Some(labels),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: HTTP_PORT,
                target_port: Some(IntOrString::Int(HTTP_PORT)),
                ..ServicePort::default()
            }]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    })?;

    chart.push(&Ingress {
        metadata: configuration.metadata(name),
        spec: Some(IngressSpec {
            ingress_class_name: configuration.ingress_class_name.clone(),
            tls: Some(vec![IngressTLS {
                hosts: Some(vec![configuration.ingress_host.clone()]),
                secret_name: Some(INGRESS_TLS_SECRET_NAME.to_string()),
            }]),
            rules: Some(vec![IngressRule {
                host: Some(configuration.ingress_host.clone()),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".to_string()),
                        path_type: "Prefix".to_string(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name: name.to_string(),
                                port: Some(ServiceBackendPort {
                                    number: Some(HTTP_PORT),
                                    ..ServiceBackendPort::default()
                                }),
                            }),
                            ..IngressBackend::default()
                        },
                    }],
                }),
            }]),
            ..IngressSpec::default()
        }),
        ..Ingress::default()
    })?;

    Ok(ApiGateway {
        chart,
        service: ServiceHandle::new(name, HTTP_PORT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> Vec<ServiceHandle> {
        [
            "webappserver",
            "authserver",
            "userservice",
            "loggingservice",
            "personaldataservice",
            "modysservice",
            "complianceservice",
            "questionnaireservice",
            "analyzerservice",
            "notificationservice",
            "sampletrackingservice",
            "feedbackstatisticservice",
            "sormasservice",
            "publicapiserver",
            "eventhistoryserver",
        ]
        .iter()
        .map(|name| ServiceHandle::new(*name, 4000))
        .collect()
    }

    fn deps(handles: &[ServiceHandle]) -> ApiGatewayDeps<'_> {
        ApiGatewayDeps {
            webappserver: &handles[0],
            authserver: &handles[1],
            userservice: &handles[2],
            loggingservice: &handles[3],
            personaldataservice: &handles[4],
            modysservice: &handles[5],
            complianceservice: &handles[6],
            questionnaireservice: &handles[7],
            analyzerservice: &handles[8],
            notificationservice: &handles[9],
            sampletrackingservice: &handles[10],
            feedbackstatisticservice: &handles[11],
            sormasservice: &handles[12],
            publicapiserver: &handles[13],
            eventhistoryserver: &handles[14],
        }
    }

    #[test]
    fn test_apigateway_ingress_terminates_tls_for_pia_app() {
        let configuration = Configuration::new().unwrap();
        let handles = handles();
        let gateway = apigateway(&configuration, &deps(&handles)).unwrap();

        let ingress = gateway
            .chart
            .objects()
            .iter()
            .find(|object| object["kind"] == "Ingress")
            .unwrap();
        assert_eq!(ingress["metadata"]["name"], "apigateway");
        let tls = ingress["spec"]["tls"].as_sequence().unwrap();
        assert_eq!(tls.len(), 1);
        assert_eq!(tls[0]["hosts"][0], "pia-app");
    }

    #[test]
    fn test_apigateway_rejects_renamed_upstreams() {
        let configuration = Configuration::new().unwrap();
        let mut handles = handles();
        handles[2] = ServiceHandle::new("users", 4000);
        assert!(apigateway(&configuration, &deps(&handles)).is_err());
    }
}
