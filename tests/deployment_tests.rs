//! # Deployment Assembly Tests
//!
//! End-to-end tests over the fully assembled object graph: labeling,
//! cross-service wiring, and the YAML stream the generator prints.

use pia_k8s::assembly::Assembly;
use pia_k8s::config::Configuration;
use pia_k8s::emit::emit_charts;
use pia_k8s::k8s::Chart;
use serde_yaml::Value;

fn assembled_charts() -> Vec<Chart> {
    let configuration = Configuration::new().expect("default configuration");
    Assembly::build(&configuration)
        .expect("assembly")
        .charts()
        .to_vec()
}

fn find_objects<'a>(charts: &'a [Chart], kind: &str) -> Vec<&'a Value> {
    charts
        .iter()
        .flat_map(|chart| chart.objects())
        .filter(|object| object["kind"] == kind)
        .collect()
}

/// Every generated object carries the `app: pia` label
#[test]
fn test_every_object_is_labeled_app_pia() {
    for chart in assembled_charts() {
        for object in chart.objects() {
            assert_eq!(
                object["metadata"]["labels"]["app"], "pia",
                "object {} of chart {} is missing the app label",
                object["metadata"]["name"].as_str().unwrap_or("?"),
                chart.name()
            );
        }
    }
}

/// Exactly one message queue StatefulSet exists, listening on AMQP
#[test]
fn test_messagequeue_statefulset() {
    let charts = assembled_charts();
    let queues: Vec<_> = find_objects(&charts, "StatefulSet")
        .into_iter()
        .filter(|object| object["metadata"]["name"] == "messagequeue")
        .collect();
    assert_eq!(queues.len(), 1);

    let ports = &queues[0]["spec"]["template"]["spec"]["containers"][0]["ports"];
    let has_amqp = ports
        .as_sequence()
        .unwrap()
        .iter()
        .any(|port| port["containerPort"] == 5672);
    assert!(has_amqp);
}

/// Three database StatefulSets exist, one per postgres instance
#[test]
fn test_database_statefulsets() {
    let charts = assembled_charts();
    let statefulsets = find_objects(&charts, "StatefulSet");
    for name in ["qpiaservice", "ewpiaservice", "ipiaservice"] {
        assert!(
            statefulsets
                .iter()
                .any(|object| object["metadata"]["name"] == name),
            "no StatefulSet named {name}"
        );
    }
}

/// The gateway owns the single Ingress, terminating TLS for exactly one host
#[test]
fn test_single_ingress_for_the_gateway() {
    let charts = assembled_charts();
    let ingresses = find_objects(&charts, "Ingress");
    assert_eq!(ingresses.len(), 1);
    assert_eq!(ingresses[0]["metadata"]["name"], "apigateway");

    let tls = ingresses[0]["spec"]["tls"].as_sequence().unwrap();
    assert_eq!(tls.len(), 1);
    assert_eq!(tls[0]["hosts"].as_sequence().unwrap().len(), 1);
    assert_eq!(tls[0]["hosts"][0], "pia-app");
    assert_eq!(tls[0]["secretName"], "ingress-tls");
}

/// The cyclic services expose their internal Services under the
/// pre-declared names
#[test]
fn test_cyclic_internal_services_exist() {
    let charts = assembled_charts();
    let services = find_objects(&charts, "Service");
    for name in ["internal-loggingservice", "internal-personaldataservice"] {
        let service = services
            .iter()
            .find(|object| object["metadata"]["name"] == name)
            .unwrap_or_else(|| panic!("no Service named {name}"));
        assert_eq!(service["spec"]["ports"][0]["port"], 5000);
    }
}

/// Every pod template pulls through the registry pull secret
#[test]
fn test_service_accounts_reference_the_pull_secret() {
    let charts = assembled_charts();
    for account in find_objects(&charts, "ServiceAccount") {
        assert_eq!(
            account["imagePullSecrets"][0]["name"], "docker-registry",
            "service account {} lacks the pull secret",
            account["metadata"]["name"].as_str().unwrap_or("?")
        );
    }
}

/// The nightly scheduler is the only CronJob
#[test]
fn test_jobscheduler_cronjob() {
    let charts = assembled_charts();
    let cronjobs = find_objects(&charts, "CronJob");
    assert_eq!(cronjobs.len(), 1);
    assert_eq!(cronjobs[0]["spec"]["schedule"], "0 2 * * *");
    assert_eq!(cronjobs[0]["spec"]["concurrencyPolicy"], "Forbid");
}

/// The emitted stream has one `---` separator per object and parses back
/// into the same number of documents
#[test]
fn test_emitted_stream_is_valid_multi_document_yaml() {
    let charts = assembled_charts();
    let object_count: usize = charts.iter().map(|chart| chart.objects().len()).sum();

    let mut buffer = Vec::new();
    emit_charts(&charts, &mut buffer).expect("emission");
    let output = String::from_utf8(buffer).expect("utf-8 output");

    let documents: Vec<Value> = output
        .split("---\n")
        .filter(|document| !document.trim().is_empty())
        .map(|document| serde_yaml::from_str(document).expect("parseable document"))
        .collect();
    assert_eq!(documents.len(), object_count);
    assert!(object_count > 50, "unexpectedly small deployment");
}

/// Generation is deterministic apart from the secret generator
#[test]
fn test_generation_is_deterministic() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    emit_charts(&assembled_charts(), &mut first).expect("emission");
    emit_charts(&assembled_charts(), &mut second).expect("emission");
    assert_eq!(first, second);
}
