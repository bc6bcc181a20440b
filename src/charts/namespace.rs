//! Namespace chart.

use crate::config::Configuration;
use crate::constants::NAMESPACE;
use crate::k8s::Chart;
use anyhow::Result;
use k8s_openapi::api::core::v1::Namespace;

pub fn namespace(configuration: &Configuration) -> Result<Chart> {
    let mut chart = Chart::new("namespace")?;
    chart.push(&Namespace {
        metadata: configuration.metadata(NAMESPACE),
        ..Namespace::default()
    })?;
    Ok(chart)
}
