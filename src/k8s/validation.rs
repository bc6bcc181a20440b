//! # Name Validation
//!
//! Validates Kubernetes resource names per RFC 1123.

use anyhow::Result;
use regex::Regex;

/// Validate a Kubernetes resource name (RFC 1123 subdomain)
///
/// Format: lowercase alphanumeric, hyphens, dots; cannot start or end with a
/// hyphen or dot; 1-253 characters.
pub fn validate_kubernetes_name(name: &str, field_name: &str) -> Result<()> {
    let name_trimmed = name.trim();

    if name_trimmed.is_empty() {
        return Err(anyhow::anyhow!("{field_name} cannot be empty"));
    }

    if name_trimmed.len() > 253 {
        return Err(anyhow::anyhow!(
            "{} '{}' exceeds maximum length of 253 characters (got {})",
            field_name,
            name_trimmed,
            name_trimmed.len()
        ));
    }

    let name_regex =
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    if !name_regex.is_match(name_trimmed) {
        return Err(anyhow::anyhow!(
            "{field_name} '{name_trimmed}' must be a valid Kubernetes name (lowercase alphanumeric, hyphens, dots; cannot start/end with hyphen or dot)"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["userservice", "internal-loggingservice", "pia-app", "a"] {
            assert!(
                validate_kubernetes_name(name, "test").is_ok(),
                "name '{name}' should be valid"
            );
        }
    }

    #[test]
    fn test_invalid_names() {
        let too_long = "a".repeat(254);
        for name in ["", "-leading", "trailing-", "Upper", "under_score", &too_long] {
            assert!(
                validate_kubernetes_name(name, "test").is_err(),
                "name '{name}' should be invalid"
            );
        }
    }
}
