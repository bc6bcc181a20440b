//! Internal secret generation.
//!
//! Produces the `pia-internal-secrets` Secret holding one freshly generated
//! random password per internal credential key. Every value is the hex
//! encoding of 64 bytes from the operating system's CSPRNG, so each run
//! yields a new set of credentials.

use crate::config::{Configuration, INTERNAL_SECRET_KEYS};
use crate::constants::{INTERNAL_SECRET_BYTES, INTERNAL_SECRET_NAME};
use crate::k8s::Chart;
use anyhow::Result;
use k8s_openapi::api::core::v1::Secret;
use rand::RngCore;
use std::collections::BTreeMap;

fn random_password() -> String {
    let mut bytes = [0u8; INTERNAL_SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Build the chart holding the internal credentials Secret
pub fn internal_secrets(configuration: &Configuration) -> Result<Chart> {
    let mut chart = Chart::new("internal-secrets")?;

    let string_data: BTreeMap<String, String> = INTERNAL_SECRET_KEYS
        .iter()
        .map(|key| ((*key).to_string(), random_password()))
        .collect();

    chart.push(&Secret {
        metadata: configuration.metadata(INTERNAL_SECRET_NAME),
        string_data: Some(string_data),
        ..Secret::default()
    })?;

    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_internal_key_gets_a_distinct_password() {
        let configuration = Configuration::new().unwrap();
        let chart = internal_secrets(&configuration).unwrap();
        assert_eq!(chart.objects().len(), 1);

        let secret = &chart.objects()[0];
        assert_eq!(secret["metadata"]["name"], "pia-internal-secrets");

        let data = secret["stringData"].as_mapping().unwrap();
        assert_eq!(data.len(), INTERNAL_SECRET_KEYS.len());

        let mut values = std::collections::BTreeSet::new();
        for (_, value) in data {
            let value = value.as_str().unwrap();
            // 64 random bytes, hex encoded
            assert_eq!(value.len(), 128);
            assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
            values.insert(value.to_string());
        }
        assert_eq!(values.len(), INTERNAL_SECRET_KEYS.len());
    }

    #[test]
    fn test_two_runs_differ() {
        let configuration = Configuration::new().unwrap();
        let first = internal_secrets(&configuration).unwrap();
        let second = internal_secrets(&configuration).unwrap();
        assert_ne!(first.objects()[0]["stringData"], second.objects()[0]["stringData"]);
    }
}
