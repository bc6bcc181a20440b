//! # Configuration Provider
//!
//! The single authoritative source for environment-derived values, secret
//! references, the default security posture, and image-name validation.
//!
//! A [`Configuration`] is computed once at program start, threaded by
//! reference through the whole build, and read-only afterwards. Every value a
//! chart consumes resolves either to a literal or to a key of one of the two
//! external secrets (`pia-internal-secrets`, `pia-config`); referencing an
//! unknown key fails while the configuration is constructed, not at runtime.

mod images;
mod names;
mod variables;

pub use images::PIA_IMAGES;
pub use names::{CONFIG_KEYS, INTERNAL_SECRET_KEYS};
pub use variables::{env_vars, SecretKeyRef, VarMap, VarValue};

use crate::constants::{
    CONFIG_SECRET_NAME, DEFAULT_VERSION, INGRESS_HOST, INTERNAL_SECRET_NAME, MAILHOG_HOST,
    PIA_VERSION_ENV, VERSION_FILE,
};
use k8s_openapi::api::core::v1::SecurityContext;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Construction-time configuration failures
///
/// Every variant is a deployment mistake meant to be fixed by a human before
/// re-running; nothing here is recoverable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("please add {0} to PIA_IMAGES before using it")]
    UnknownImage(String),
    #[error("{0} is not a key of the {INTERNAL_SECRET_NAME} secret")]
    UnknownInternalSecretKey(String),
    #[error("{0} is not a key of the {CONFIG_SECRET_NAME} secret")]
    UnknownConfigKey(String),
}

/// Database credentials of one PostgreSQL instance
#[derive(Debug, Clone)]
pub struct DbVariables {
    pub user: VarValue,
    pub password: VarValue,
    pub db: VarValue,
}

/// Keycloak client secrets and related settings
#[derive(Debug, Clone)]
pub struct AuthserverVariables {
    pub proband_management_client_secret: VarValue,
    pub admin_management_client_secret: VarValue,
    pub proband_token_introspection_client_secret: VarValue,
    pub admin_token_introspection_client_secret: VarValue,
    pub proband_terms_of_service_url: VarValue,
    pub proband_policy_url: VarValue,
    /// Fixed exchange name; the keycloak plugin has it hardcoded
    pub message_queue_exchange: VarValue,
}

/// Outgoing mail server settings
#[derive(Debug, Clone)]
pub struct MailVariables {
    pub host: VarValue,
    pub port: VarValue,
    pub user: VarValue,
    pub password: VarValue,
    pub require_tls: VarValue,
    pub from_address: VarValue,
    pub from_name: VarValue,
}

/// MODYS import settings
#[derive(Debug, Clone)]
pub struct ModysVariables {
    pub base_url: VarValue,
    pub user_name: VarValue,
    pub password: VarValue,
    pub study: VarValue,
    pub identifier_type_id: VarValue,
    pub request_concurrency: VarValue,
}

/// Message queue accounts
#[derive(Debug, Clone)]
pub struct MessageQueueVariables {
    pub admin_password: VarValue,
    pub app_password: VarValue,
    pub app_user: VarValue,
}

/// Firebase push-notification credentials
#[derive(Debug, Clone)]
pub struct FirebaseVariables {
    pub private_key_base64: VarValue,
    pub project_id: VarValue,
    pub client_email: VarValue,
}

/// The table of named configuration variables consumed by the service charts
#[derive(Debug, Clone)]
pub struct ConfigurationVariables {
    pub qpia: DbVariables,
    pub ewpia: DbVariables,
    pub ipia: DbVariables,

    pub log_user: VarValue,
    pub log_password: VarValue,
    pub sormas_user: VarValue,
    pub sormas_password: VarValue,
    pub feedback_statistic_user: VarValue,
    pub feedback_statistic_password: VarValue,
    pub event_history_user: VarValue,
    pub event_history_password: VarValue,
    pub personaldata_user: VarValue,
    pub personaldata_password: VarValue,

    pub authserver_user: VarValue,
    pub authserver_password: VarValue,
    pub authserver_db: VarValue,
    /// Keycloak does not update this password from the env into its db, so
    /// there is currently no easy way to rotate it
    pub authserver_admin_password: VarValue,
    pub authserver: AuthserverVariables,

    pub mail: MailVariables,
    pub modys: ModysVariables,
    pub message_queue: MessageQueueVariables,
    pub firebase: FirebaseVariables,

    pub webapp_url: VarValue,
    pub external_protocol: VarValue,
    pub external_port: VarValue,
    pub external_host: VarValue,

    pub is_sormas_enabled: VarValue,
    /// NEVER SET THIS ON ANY SYSTEM THAT COULD CONTAIN SENSITIVE DATA!
    pub is_development_system: VarValue,
    pub user_password_length: VarValue,

    /// X-Frame-Options header for the web app; only needed for older
    /// browsers without CSP support
    pub x_frame_options: VarValue,
    /// Content-Security-Policy header for the web app
    pub content_security_policy: VarValue,
    pub default_language: VarValue,
}

/// Reference a key of the generated internal secret
fn internal_secret(key: &str) -> Result<VarValue, ConfigError> {
    if !INTERNAL_SECRET_KEYS.contains(&key) {
        return Err(ConfigError::UnknownInternalSecretKey(key.to_string()));
    }
    Ok(VarValue::Secret(SecretKeyRef::new(INTERNAL_SECRET_NAME, key)))
}

/// Reference a key of the operator-provided configuration secret
fn pia_config(key: &str) -> Result<VarValue, ConfigError> {
    if !CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownConfigKey(key.to_string()));
    }
    Ok(VarValue::Secret(SecretKeyRef::new(CONFIG_SECRET_NAME, key)))
}

impl ConfigurationVariables {
    fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            qpia: DbVariables {
                user: "superuser".into(),
                password: internal_secret("qpia_superuser_db")?,
                db: "pia_database".into(),
            },
            ewpia: DbVariables {
                user: "superuser".into(),
                password: internal_secret("ewpia_supersuser_db")?,
                db: "pia_database".into(),
            },
            ipia: DbVariables {
                user: "superuser".into(),
                password: internal_secret("ipia_superuser_db")?,
                db: "pia_database".into(),
            },

            log_user: "loggingservice".into(),
            log_password: internal_secret("loggingservice_db")?,
            sormas_user: "sormasservice".into(),
            sormas_password: internal_secret("sormasservice_db")?,
            feedback_statistic_user: "feedbackstatisticservice".into(),
            feedback_statistic_password: internal_secret("feedbackstatisticservice_db")?,
            event_history_user: "eventhistoryserver".into(),
            event_history_password: internal_secret("eventhistoryserver_db")?,
            personaldata_user: "personaldataservice".into(),
            personaldata_password: internal_secret("personaldataservice_db")?,

            authserver_user: "authserver".into(),
            authserver_password: internal_secret("authserver_db")?,
            authserver_db: "pia_database".into(),
            authserver_admin_password: internal_secret("authserver_admin_user")?,
            authserver: AuthserverVariables {
                proband_management_client_secret: internal_secret(
                    "authserver_proband_management_client_secret",
                )?,
                admin_management_client_secret: internal_secret(
                    "authserver_admin_management_client_secret",
                )?,
                proband_token_introspection_client_secret: internal_secret(
                    "authserver_proband_token_introspection_client_secret",
                )?,
                admin_token_introspection_client_secret: internal_secret(
                    "authserver_admin_token_introspection_client_secret",
                )?,
                proband_terms_of_service_url: pia_config("probandTermsOfServiceUrl")?,
                proband_policy_url: pia_config("probandPolicyUrl")?,
                message_queue_exchange: "keycloak.events".into(),
            },

            mail: MailVariables {
                host: pia_config("mailServerHostName")?,
                port: pia_config("mailServerPort")?,
                user: pia_config("mailServerUserName")?,
                password: pia_config("mailServerPassword")?,
                require_tls: pia_config("mailServerRequireTls")?,
                from_address: pia_config("mailServerFromAddress")?,
                from_name: pia_config("mailServerFromName")?,
            },
            modys: ModysVariables {
                base_url: pia_config("modysBaseUrl")?,
                user_name: pia_config("modysUserName")?,
                password: pia_config("modysPassword")?,
                study: pia_config("modysStudy")?,
                identifier_type_id: pia_config("modysIdentifierTypeId")?,
                request_concurrency: pia_config("modysRequestConcurrency")?,
            },
            message_queue: MessageQueueVariables {
                admin_password: internal_secret("messagequeue_admin")?,
                app_password: internal_secret("messagequeue_app")?,
                app_user: "app".into(),
            },
            firebase: FirebaseVariables {
                private_key_base64: pia_config("firebasePrivateKeyBase64")?,
                project_id: pia_config("firebaseProjectId")?,
                client_email: pia_config("firebaseClientEmail")?,
            },

            webapp_url: pia_config("webappUrl")?,
            external_protocol: pia_config("externalProtocol")?,
            external_port: pia_config("externalPort")?,
            external_host: pia_config("externalHost")?,

            is_sormas_enabled: pia_config("isSormasEnabled")?,
            is_development_system: false.into(),
            user_password_length: pia_config("userPasswordLength")?,

            x_frame_options: "".into(),
            content_security_policy: "".into(),
            default_language: pia_config("defaultLanguage")?,
        })
    }
}

/// Process-wide configuration, computed once and read-only thereafter
#[derive(Debug, Clone)]
pub struct Configuration {
    pub pia_version: String,
    pub ingress_host: String,
    pub ingress_class_name: Option<String>,
    pub storage_class_name: Option<String>,
    pub mailhog_host: String,
    pub variables: ConfigurationVariables,
}

impl Configuration {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pia_version: pia_version(),
            ingress_host: INGRESS_HOST.to_string(),
            ingress_class_name: None,
            storage_class_name: None,
            mailhog_host: MAILHOG_HOST.to_string(),
            variables: ConfigurationVariables::new()?,
        })
    }

    /// Registry path of a registered image, tagged with the computed version
    pub fn image(&self, name: &str) -> Result<String, ConfigError> {
        images::image(name, &self.pia_version)
    }

    /// Registry paths of every registered image
    pub fn all_images(&self) -> Result<Vec<String>, ConfigError> {
        images::all_images(&self.pia_version)
    }

    /// The hardened default posture every container starts from
    ///
    /// Charts override single fields when an image cannot comply, never the
    /// whole context.
    pub fn default_security_context(&self) -> SecurityContext {
        SecurityContext {
            run_as_non_root: Some(true),
            read_only_root_filesystem: Some(true),
            allow_privilege_escalation: Some(false),
            ..SecurityContext::default()
        }
    }

    /// The label set attached to every emitted object
    pub fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("app".to_string(), crate::constants::APP_LABEL.to_string())])
    }

    /// Standard object metadata: name plus the mandatory `app: pia` label
    pub fn metadata(&self, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(self.labels()),
            ..ObjectMeta::default()
        }
    }
}

/// Resolve the image tag: env override, then version file, then `latest`
fn pia_version() -> String {
    if let Ok(version) = std::env::var(PIA_VERSION_ENV) {
        if !version.trim().is_empty() {
            warn!("using version {version} from env {PIA_VERSION_ENV}");
            return version.trim().to_string();
        }
    }

    if Path::new(VERSION_FILE).exists() {
        if let Ok(version) = fs::read_to_string(VERSION_FILE) {
            let version = version.trim().to_string();
            warn!("using version {version} from file {VERSION_FILE}");
            return version;
        }
    }

    warn!("fallback to \"{DEFAULT_VERSION}\" version");
    DEFAULT_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_builds_with_known_keys_only() {
        let config = Configuration::new().unwrap();
        assert_eq!(config.ingress_host, "pia-app");
        assert_eq!(config.mailhog_host, "mailhog");
    }

    #[test]
    fn test_unknown_secret_key_is_rejected() {
        let err = internal_secret("no_such_password").unwrap_err();
        assert!(err.to_string().contains("no_such_password"));

        let err = pia_config("noSuchConfig").unwrap_err();
        assert!(err.to_string().contains("noSuchConfig"));
    }

    #[test]
    fn test_all_images_are_tagged_with_the_resolved_version() {
        let config = Configuration::new().unwrap();
        let images = config.all_images().unwrap();
        assert_eq!(images.len(), PIA_IMAGES.len());
        assert!(images
            .iter()
            .all(|image| image.ends_with(&format!(":{}", config.pia_version))));
    }

    #[test]
    fn test_default_security_context_is_hardened() {
        let config = Configuration::new().unwrap();
        let context = config.default_security_context();
        assert_eq!(context.run_as_non_root, Some(true));
        assert_eq!(context.read_only_root_filesystem, Some(true));
        assert_eq!(context.allow_privilege_escalation, Some(false));
    }

    #[test]
    fn test_metadata_carries_the_app_label() {
        let config = Configuration::new().unwrap();
        let metadata = config.metadata("userservice");
        assert_eq!(metadata.name.as_deref(), Some("userservice"));
        assert_eq!(
            metadata.labels.unwrap().get("app").map(String::as_str),
            Some("pia")
        );
    }
}
