//! The three PostgreSQL instances: qPIA (study data), ewPIA (compliance),
//! iPIA (personal data and the authserver schema).

use crate::builders::{DatabaseBuilder, DatabaseService};
use crate::config::Configuration;
use anyhow::Result;

pub fn qpiaservice(configuration: &Configuration) -> Result<DatabaseService> {
    let variables = &configuration.variables.qpia;
    DatabaseBuilder::new(configuration, "qpiaservice", "psa.database")
        .variables(vec![
            ("POSTGRES_USER", variables.user.clone()),
            ("POSTGRES_PASSWORD", variables.password.clone()),
            ("POSTGRES_DB", variables.db.clone()),
        ])
        .build()
}

pub fn ewpiaservice(configuration: &Configuration) -> Result<DatabaseService> {
    let variables = &configuration.variables.ewpia;
    DatabaseBuilder::new(configuration, "ewpiaservice", "psa.database.ewpia")
        .variables(vec![
            ("POSTGRES_USER", variables.user.clone()),
            ("POSTGRES_PASSWORD", variables.password.clone()),
            ("POSTGRES_DB", variables.db.clone()),
        ])
        .build()
}

pub fn ipiaservice(configuration: &Configuration) -> Result<DatabaseService> {
    let variables = &configuration.variables.ipia;
    DatabaseBuilder::new(configuration, "ipiaservice", "psa.database.ipia")
        .variables(vec![
            ("POSTGRES_USER", variables.user.clone()),
            ("POSTGRES_PASSWORD", variables.password.clone()),
            ("POSTGRES_DB", variables.db.clone()),
        ])
        .build()
}
