//! YAML emission.
//!
//! Serializes every object of every chart as one multi-document YAML stream,
//! `---` separated, in assembly order.

use crate::k8s::Chart;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;

/// Write all objects of the given charts to the sink as one YAML stream
pub fn emit_charts<W: Write>(charts: &[Chart], sink: &mut W) -> Result<()> {
    let mut count = 0usize;
    for chart in charts {
        for object in chart.objects() {
            sink.write_all(b"---\n")
                .context("failed to write the document separator")?;
            let document = serde_yaml::to_string(object)
                .with_context(|| format!("failed to serialize an object of chart {}", chart.name()))?;
            sink.write_all(document.as_bytes())
                .with_context(|| format!("failed to write an object of chart {}", chart.name()))?;
            count += 1;
        }
        debug!(chart = chart.name(), "chart emitted");
    }
    debug!(objects = count, charts = charts.len(), "emission finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Namespace;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_emit_separates_documents_in_chart_order() {
        let mut first = Chart::new("first").unwrap();
        let mut second = Chart::new("second").unwrap();
        for (chart, name) in [(&mut first, "alpha"), (&mut second, "beta")] {
            chart
                .push(&Namespace {
                    metadata: ObjectMeta {
                        name: Some(name.to_string()),
                        ..ObjectMeta::default()
                    },
                    ..Namespace::default()
                })
                .unwrap();
        }

        let mut buffer = Vec::new();
        emit_charts(&[first, second], &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(output.matches("---\n").count(), 2);
        let alpha = output.find("name: alpha").unwrap();
        let beta = output.find("name: beta").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn test_emit_nothing_for_empty_charts() {
        let chart = Chart::new("empty").unwrap();
        let mut buffer = Vec::new();
        emit_charts(&[chart], &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
