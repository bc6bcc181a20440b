//! # Secret Key Names
//!
//! The fixed key lists of the two external secret stores.
//!
//! `INTERNAL_SECRET_KEYS` names every password that `generate-internal-secrets`
//! creates inside the `pia-internal-secrets` secret. `CONFIG_KEYS` names every
//! value an operator must provide in the `pia-config` secret. Both lists feed
//! the precheck gate, so a key added here is automatically required before
//! deployment.

/// Keys of the generated `pia-internal-secrets` secret
///
/// `ewpia_supersuser_db` keeps its historical spelling; the consuming images
/// reference the key verbatim.
pub const INTERNAL_SECRET_KEYS: [&str; 16] = [
    "qpia_superuser_db",
    "ewpia_supersuser_db",
    "ipia_superuser_db",
    "loggingservice_db",
    "sormasservice_db",
    "feedbackstatisticservice_db",
    "eventhistoryserver_db",
    "personaldataservice_db",
    "authserver_db",
    "authserver_admin_user",
    "authserver_proband_management_client_secret",
    "authserver_admin_management_client_secret",
    "authserver_proband_token_introspection_client_secret",
    "authserver_admin_token_introspection_client_secret",
    "messagequeue_admin",
    "messagequeue_app",
];

/// Keys of the operator-provided `pia-config` secret
pub const CONFIG_KEYS: [&str; 26] = [
    "webappUrl",
    "externalProtocol",
    "externalPort",
    "externalHost",
    "mailServerHostName",
    "mailServerPort",
    "mailServerUserName",
    "mailServerPassword",
    "mailServerRequireTls",
    "mailServerFromAddress",
    "mailServerFromName",
    "probandTermsOfServiceUrl",
    "probandPolicyUrl",
    "modysBaseUrl",
    "modysUserName",
    "modysPassword",
    "modysStudy",
    "modysIdentifierTypeId",
    "modysRequestConcurrency",
    "isSormasEnabled",
    "userPasswordLength",
    "firebasePrivateKeyBase64",
    "firebaseProjectId",
    "firebaseClientEmail",
    "mailhogAuth",
    "defaultLanguage",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_key_lists_contain_no_duplicates() {
        let secrets: BTreeSet<_> = INTERNAL_SECRET_KEYS.iter().collect();
        assert_eq!(secrets.len(), INTERNAL_SECRET_KEYS.len());

        let configs: BTreeSet<_> = CONFIG_KEYS.iter().collect();
        assert_eq!(configs.len(), CONFIG_KEYS.len());
    }
}
