//! # Environment Variables
//!
//! Typed environment-variable values and their normalization into Kubernetes
//! `EnvVar` entries.
//!
//! Container images only ever see strings, so every literal is normalized to
//! its string form here, in one place. Secret references never pass through
//! the generator as plaintext; they become `valueFrom` entries resolved by
//! the kubelet.

use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};

/// Reference to a single key of a named secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyRef {
    pub secret: String,
    pub key: String,
}

impl SecretKeyRef {
    pub fn new(secret: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            key: key.into(),
        }
    }
}

/// A value assigned to an environment variable
///
/// Literals are stringified on normalization; secret references stay
/// references. There is deliberately no catch-all variant: a value that is
/// not representable here must not reach a container.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Secret(SecretKeyRef),
}

impl VarValue {
    /// Normalize into the string/`valueFrom` split of a Kubernetes `EnvVar`
    fn into_env_var(self, name: &str) -> EnvVar {
        match self {
            Self::Str(value) => EnvVar {
                name: name.to_string(),
                value: Some(value),
                ..EnvVar::default()
            },
            Self::Int(value) => EnvVar {
                name: name.to_string(),
                value: Some(value.to_string()),
                ..EnvVar::default()
            },
            Self::Bool(value) => EnvVar {
                name: name.to_string(),
                value: Some(if value { "true" } else { "false" }.to_string()),
                ..EnvVar::default()
            },
            Self::Secret(secret_ref) => EnvVar {
                name: name.to_string(),
                value_from: Some(EnvVarSource {
                    secret_key_ref: Some(SecretKeySelector {
                        name: secret_ref.secret,
                        key: secret_ref.key,
                        optional: None,
                    }),
                    ..EnvVarSource::default()
                }),
                ..EnvVar::default()
            },
        }
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for VarValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for VarValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<SecretKeyRef> for VarValue {
    fn from(value: SecretKeyRef) -> Self {
        Self::Secret(value)
    }
}

/// Ordered environment-variable map; insertion order is emission order
pub type VarMap = Vec<(&'static str, VarValue)>;

/// Normalize a whole variable map into Kubernetes `EnvVar` entries
pub fn env_vars(variables: VarMap) -> Vec<EnvVar> {
    variables
        .into_iter()
        .map(|(name, value)| value.into_env_var(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booleans_normalize_to_literal_strings() {
        let vars = env_vars(vec![
            ("ENABLED", VarValue::from(true)),
            ("DISABLED", VarValue::from(false)),
        ]);
        assert_eq!(vars[0].value.as_deref(), Some("true"));
        assert_eq!(vars[1].value.as_deref(), Some("false"));
    }

    #[test]
    fn test_numbers_normalize_to_decimal_strings() {
        let vars = env_vars(vec![("PORT", VarValue::from(80))]);
        assert_eq!(vars[0].name, "PORT");
        assert_eq!(vars[0].value.as_deref(), Some("80"));
    }

    #[test]
    fn test_strings_pass_through_unchanged() {
        let vars = env_vars(vec![("HOST", VarValue::from("qpiaservice"))]);
        assert_eq!(vars[0].value.as_deref(), Some("qpiaservice"));
        assert!(vars[0].value_from.is_none());
    }

    #[test]
    fn test_secret_refs_become_value_from_entries() {
        let vars = env_vars(vec![(
            "DB_PASSWORD",
            VarValue::from(SecretKeyRef::new("pia-internal-secrets", "qpia_superuser_db")),
        )]);
        assert!(vars[0].value.is_none());
        let key_ref = vars[0]
            .value_from
            .as_ref()
            .and_then(|source| source.secret_key_ref.as_ref())
            .unwrap();
        assert_eq!(key_ref.name, "pia-internal-secrets");
        assert_eq!(key_ref.key, "qpia_superuser_db");
    }

    #[test]
    fn test_env_vars_preserve_insertion_order() {
        let vars = env_vars(vec![
            ("B", VarValue::from("2")),
            ("A", VarValue::from("1")),
        ]);
        assert_eq!(vars[0].name, "B");
        assert_eq!(vars[1].name, "A");
    }
}
