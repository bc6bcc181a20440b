//! # Constants
//!
//! Shared constants used throughout the generator.
//!
//! Names and ports in this module are cross-service contracts: several
//! container images have them hardcoded, so changing a value here without
//! rebuilding the affected images will break routing.

/// Container registry prefix all PIA images are pulled from
pub const IMAGE_REGISTRY: &str = "registry.hzdr.de/pia-eresearch-system/pia";

/// Environment variable that overrides the computed image tag
pub const PIA_VERSION_ENV: &str = "PIA_VERSION";

/// Fallback version file, relative to the working directory
pub const VERSION_FILE: &str = "../VERSION";

/// Image tag used when neither the env override nor the version file is present
pub const DEFAULT_VERSION: &str = "latest";

/// Mandatory `app` label value on every emitted object
pub const APP_LABEL: &str = "pia";

/// Namespace all charts are deployed into
pub const NAMESPACE: &str = "pia";

/// Public HTTP port of every node-js shaped service
pub const NODEJS_PUBLIC_PORT: i32 = 4000;

/// Internal HTTP port of every node-js shaped service
pub const NODEJS_INTERNAL_PORT: i32 = 5000;

/// PostgreSQL port exposed by the database charts
pub const POSTGRES_PORT: i32 = 5432;

/// AMQP port exposed by the message queue chart
pub const AMQP_PORT: i32 = 5672;

/// RabbitMQ management port
pub const AMQP_MANAGEMENT_PORT: i32 = 15672;

/// Name of the generated secret holding internal passwords
pub const INTERNAL_SECRET_NAME: &str = "pia-internal-secrets";

/// Name of the operator-provided configuration secret
pub const CONFIG_SECRET_NAME: &str = "pia-config";

/// Name of the operator-provided registry pull secret
pub const DOCKER_CONFIG_SECRET_NAME: &str = "docker-registry";

/// Name of the operator-provided TLS secret for the ingress
pub const INGRESS_TLS_SECRET_NAME: &str = "ingress-tls";

/// Host name the ingress terminates TLS for
pub const INGRESS_HOST: &str = "pia-app";

/// Service name the mail sink is reachable under
pub const MAILHOG_HOST: &str = "mailhog";

/// Number of random bytes per generated internal secret (hex-encoded on emission)
pub const INTERNAL_SECRET_BYTES: usize = 64;
