//! Job scheduler chart: a nightly CronJob triggering periodic tasks over the
//! services' internal APIs.

use crate::builders::service_account;
use crate::config::{env_vars, Configuration};
use crate::k8s::{Chart, ServiceHandle};
use anyhow::Result;
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec, JobTemplateSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};

pub fn jobscheduler(
    configuration: &Configuration,
    userservice: &ServiceHandle,
    questionnaireservice: &ServiceHandle,
) -> Result<Chart> {
    let name = "jobscheduler";
    let mut chart = Chart::new(name)?;

    chart.push(&service_account(configuration, name))?;

    let container = Container {
        name: name.to_string(),
        image: Some(configuration.image("psa.server.jobscheduler")?),
        image_pull_policy: Some("IfNotPresent".to_string()),
        env: Some(env_vars(vec![
            ("USERSERVICE_HOST", userservice.host_var()),
            ("USERSERVICE_PORT", userservice.port_var()),
            ("QUESTIONNAIRESERVICE_HOST", questionnaireservice.host_var()),
            ("QUESTIONNAIRESERVICE_PORT", questionnaireservice.port_var()),
        ])),
        security_context: Some(configuration.default_security_context()),
        ..Container::default()
    };

    chart.push(&CronJob {
        metadata: configuration.metadata(name),
        spec: Some(CronJobSpec {
            schedule: "0 2 * * *".to_string(),
            concurrency_policy: Some("Forbid".to_string()),
            job_template: JobTemplateSpec {
                metadata: Some(configuration.metadata(name)),
                spec: Some(JobSpec {
                    template: PodTemplateSpec {
                        metadata: Some(configuration.metadata(name)),
                        spec: Some(PodSpec {
                            service_account_name: Some(name.to_string()),
                            enable_service_links: Some(false),
                            restart_policy: Some("Never".to_string()),
                            containers: vec![container],
                            ..PodSpec::default()
                        }),
                    },
                    ..JobSpec::default()
                }),
            },
            ..CronJobSpec::default()
        }),
        ..CronJob::default()
    })?;

    Ok(chart)
}
