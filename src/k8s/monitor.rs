//! # ServiceMonitor
//!
//! Minimal shape of the `monitoring.coreos.com/v1` ServiceMonitor custom
//! resource, enough to register a service for metrics scraping.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceMonitor {
    pub metadata: ObjectMeta,
    pub spec: ServiceMonitorSpec,
}

impl k8s_openapi::Resource for ServiceMonitor {
    const API_VERSION: &'static str = "monitoring.coreos.com/v1";
    const GROUP: &'static str = "monitoring.coreos.com";
    const KIND: &'static str = "ServiceMonitor";
    const VERSION: &'static str = "v1";
    const URL_PATH_SEGMENT: &'static str = "servicemonitors";
    type Scope = k8s_openapi::NamespaceResourceScope;
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceMonitorSpec {
    pub selector: LabelSelector,
    pub endpoints: Vec<ServiceMonitorEndpoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceMonitorEndpoint {
    pub port: String,
    pub path: String,
}

impl ServiceMonitor {
    /// Register the service carrying the given `service-name` label for
    /// scraping on the named port
    pub fn new(metadata: ObjectMeta, service_name: &str, port: &str) -> Self {
        Self {
            metadata,
            spec: ServiceMonitorSpec {
                selector: LabelSelector {
                    match_labels: Some(
                        [("service-name".to_string(), service_name.to_string())].into(),
                    ),
                    ..LabelSelector::default()
                },
                endpoints: vec![ServiceMonitorEndpoint {
                    port: port.to_string(),
                    path: "/metrics".to_string(),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::Resource;

    #[test]
    fn test_service_monitor_selects_the_service_name_label() {
        let monitor = ServiceMonitor::new(ObjectMeta::default(), "userservice", "http");
        assert_eq!(ServiceMonitor::API_VERSION, "monitoring.coreos.com/v1");
        assert_eq!(ServiceMonitor::KIND, "ServiceMonitor");
        assert_eq!(
            monitor
                .spec
                .selector
                .match_labels
                .unwrap()
                .get("service-name")
                .map(String::as_str),
            Some("userservice")
        );
        assert_eq!(monitor.spec.endpoints[0].path, "/metrics");
    }
}
