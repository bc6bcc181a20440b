//! # Kubernetes Values
//!
//! The in-memory representation of the generated object graph: named charts,
//! service handles, the `ServiceMonitor` CRD shape, and resource-name
//! validation.

mod chart;
mod handle;
mod monitor;
mod validation;

pub use chart::Chart;
pub use handle::ServiceHandle;
pub use monitor::{ServiceMonitor, ServiceMonitorEndpoint, ServiceMonitorSpec};
pub use validation::validate_kubernetes_name;
