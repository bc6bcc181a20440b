//! # Chart
//!
//! A named subtree of Kubernetes object definitions, the unit of composition
//! in this generator.

use crate::k8s::validation::validate_kubernetes_name;
use anyhow::{Context, Result};
use k8s_openapi::Resource;
use serde::Serialize;

/// A named, ordered list of serialized Kubernetes objects
///
/// Charts are append-only while they are under construction and immutable
/// afterwards; the assembly serializes each exactly once, in insertion order.
#[derive(Debug, Clone)]
pub struct Chart {
    name: String,
    objects: Vec<serde_yaml::Value>,
}

impl Chart {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_kubernetes_name(&name, "chart name")?;
        Ok(Self {
            name,
            objects: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one Kubernetes object to the chart
    ///
    /// The struct definitions carry `apiVersion` and `kind` as type-level
    /// constants, not fields, so both are spliced into the serialized value
    /// here. They come first so the emitted documents read naturally.
    pub fn push<T: Resource + Serialize>(&mut self, object: &T) -> Result<()> {
        let value = serde_yaml::to_value(object)
            .with_context(|| format!("failed to serialize an object of chart {}", self.name))?;

        let mut tagged = serde_yaml::Mapping::new();
        tagged.insert("apiVersion".into(), T::API_VERSION.into());
        tagged.insert("kind".into(), T::KIND.into());
        if let serde_yaml::Value::Mapping(fields) = value {
            for (key, field) in fields {
                tagged.insert(key, field);
            }
        }

        self.objects.push(serde_yaml::Value::Mapping(tagged));
        Ok(())
    }

    pub fn objects(&self) -> &[serde_yaml::Value] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Namespace;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_chart_rejects_invalid_names() {
        assert!(Chart::new("UserService").is_err());
        assert!(Chart::new("").is_err());
        assert!(Chart::new("userservice").is_ok());
    }

    #[test]
    fn test_push_tags_objects_and_keeps_insertion_order() {
        let mut chart = Chart::new("namespaces").unwrap();
        for name in ["first", "second"] {
            let namespace = Namespace {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    ..ObjectMeta::default()
                },
                ..Namespace::default()
            };
            chart.push(&namespace).unwrap();
        }
        assert_eq!(chart.objects().len(), 2);
        assert_eq!(chart.objects()[0]["apiVersion"], "v1");
        assert_eq!(chart.objects()[0]["kind"], "Namespace");
        assert_eq!(chart.objects()[0]["metadata"]["name"], "first");
        assert_eq!(chart.objects()[1]["metadata"]["name"], "second");
    }
}
