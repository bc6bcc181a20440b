//! # Image Allow-List
//!
//! The fixed list of container images the generator may reference.
//!
//! Looking up an image outside this list is a construction-time error: an
//! unregistered image would otherwise only fail at pull time, long after the
//! manifests have been applied.

use crate::config::ConfigError;
use crate::constants::IMAGE_REGISTRY;

/// Every image identifier that may appear in a chart
pub const PIA_IMAGES: [&str; 24] = [
    "k8s",
    "psa.database",
    "psa.database.ewpia",
    "psa.database.ipia",
    "psa.server.messagequeue",
    "psa.server.auth",
    "psa.app.web",
    "psa.service.userservice",
    "psa.service.loggingservice",
    "psa.service.personaldataservice",
    "psa.service.modysservice",
    "psa.service.complianceservice",
    "psa.service.sampletrackingservice",
    "psa.server.publicapi",
    "psa.server.eventhistory",
    "psa.service.questionnaireservice",
    "psa.service.analyzerservice",
    "psa.service.notificationservice",
    "psa.service.feedbackstatisticservice",
    "psa.service.sormasservice",
    "psa.server.apigateway",
    "psa.server.autheventproxy",
    "psa.server.mailserver",
    "psa.server.jobscheduler",
];

/// Compose the full registry path for a registered image
pub fn image(name: &str, version: &str) -> Result<String, ConfigError> {
    if !PIA_IMAGES.contains(&name) {
        return Err(ConfigError::UnknownImage(name.to_string()));
    }
    Ok(format!("{IMAGE_REGISTRY}/{name}:{version}"))
}

/// Compose the full registry path for every registered image
///
/// Used by image-prefetch tooling outside the generator itself.
pub fn all_images(version: &str) -> Result<Vec<String>, ConfigError> {
    PIA_IMAGES.iter().map(|name| image(name, version)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_composes_registry_path() {
        let image = image("psa.service.userservice", "1.2.3").unwrap();
        assert_eq!(
            image,
            "registry.hzdr.de/pia-eresearch-system/pia/psa.service.userservice:1.2.3"
        );
    }

    #[test]
    fn test_image_rejects_unregistered_name() {
        let err = image("psa.service.unknown", "1.2.3").unwrap_err();
        assert!(err.to_string().contains("psa.service.unknown"));
        assert!(err.to_string().contains("PIA_IMAGES"));
    }

    #[test]
    fn test_all_images_covers_the_allow_list() {
        let images = all_images("latest").unwrap();
        assert_eq!(images.len(), PIA_IMAGES.len());
        assert!(images
            .iter()
            .all(|image| image.starts_with("registry.hzdr.de/pia-eresearch-system/pia/")));
    }
}
