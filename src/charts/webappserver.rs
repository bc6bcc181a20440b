//! Web application server chart, serving the compiled single-page app.

use crate::builders::{NodeJsBuilder, NodeJsService};
use crate::config::Configuration;
use anyhow::Result;

pub fn webappserver(configuration: &Configuration) -> Result<NodeJsService> {
    let variables = &configuration.variables;
    NodeJsBuilder::new(configuration, "webappserver", "psa.app.web")
        .variables(vec![
            ("WEBAPP_URL", variables.webapp_url.clone()),
            ("DEFAULT_LANGUAGE", variables.default_language.clone()),
            ("IS_DEVELOPMENT_SYSTEM", variables.is_development_system.clone()),
            ("IS_SORMAS_ENABLED", variables.is_sormas_enabled.clone()),
        ])
        // nginx writes its pid file and proxy buffers to the root filesystem
        .writable_root_filesystem()
        .build()
}
