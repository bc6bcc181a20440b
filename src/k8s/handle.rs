//! # Service Handle
//!
//! The externally visible output of a chart: the DNS name and port under
//! which its Service is reachable.
//!
//! A handle is produced exclusively by the chart that owns the underlying
//! Service object; consumers hold read-only references. For the two
//! legitimate dependency cycles the handle doubles as a pre-declared
//! contract: the expected value is computed before the owning chart exists
//! and compared field-for-field against the real handle afterwards.

use crate::config::VarValue;
use crate::constants::NODEJS_INTERNAL_PORT;

/// DNS name and port of a Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub name: String,
    pub port: i32,
}

impl ServiceHandle {
    pub fn new(name: impl Into<String>, port: i32) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }

    /// The deterministic internal handle of a node-js shaped service
    ///
    /// Used to pre-declare the contract of a chart that does not exist yet;
    /// the builder guarantees the real internal Service matches.
    pub fn internal(service_name: &str) -> Self {
        Self::new(format!("internal-{service_name}"), NODEJS_INTERNAL_PORT)
    }

    /// The host as an environment-variable value
    pub fn host_var(&self) -> VarValue {
        VarValue::Str(self.name.clone())
    }

    /// The port as an environment-variable value
    pub fn port_var(&self) -> VarValue {
        VarValue::Int(i64::from(self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_handle_is_prefixed_and_on_port_5000() {
        let handle = ServiceHandle::internal("loggingservice");
        assert_eq!(handle.name, "internal-loggingservice");
        assert_eq!(handle.port, 5000);
    }

    #[test]
    fn test_handle_vars() {
        let handle = ServiceHandle::new("qpiaservice", 5432);
        assert_eq!(handle.host_var(), VarValue::Str("qpiaservice".to_string()));
        assert_eq!(handle.port_var(), VarValue::Int(5432));
    }
}
