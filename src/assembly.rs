//! # Main Assembly
//!
//! Constructs every chart in dependency order and collects the ordered list
//! of root charts. Serialization order equals insertion order; it is not
//! semantically significant but keeps the output deterministic.
//!
//! There are two legitimate dependency cycles:
//!
//! - `loggingservice -> userservice -> loggingservice`
//! - `personaldataservice -> userservice -> personaldataservice`
//!
//! They are broken in two phases: the deterministic internal (name, port)
//! contracts are computed as plain values before either chart exists, fed
//! into the user service, and compared field-for-field against the real
//! handles once the cyclic charts are constructed. A mismatch is a
//! programmer error and aborts the assembly.

use crate::charts::{
    analyzerservice, apigateway, authserver, autheventproxy, complianceservice, ewpiaservice,
    eventhistoryserver, feedbackstatisticservice, ipiaservice, jobscheduler, loggingservice,
    mailserver, messagequeue, modysservice, namespace, notificationservice, personaldataservice,
    publicapiserver, qpiaservice, questionnaireservice, sampletrackingservice, sormasservice,
    userservice, webappserver, ApiGatewayDeps, ComplianceServiceDeps, FeedbackStatisticServiceDeps,
    LoggingServiceDeps, NotificationServiceDeps, PersonaldataServiceDeps, QuestionnaireServiceDeps,
    SampleTrackingServiceDeps, SormasServiceDeps, UserServiceDeps,
};
use crate::config::Configuration;
use crate::k8s::{Chart, ServiceHandle};
use anyhow::{ensure, Result};
use tracing::debug;

/// The fully assembled object graph
#[derive(Debug)]
pub struct Assembly {
    charts: Vec<Chart>,
}

impl Assembly {
    /// Build every chart in dependency order
    pub fn build(configuration: &Configuration) -> Result<Self> {
        let namespace = namespace(configuration)?;

        let qpia = qpiaservice(configuration)?;
        let ewpia = ewpiaservice(configuration)?;
        let ipia = ipiaservice(configuration)?;

        let queue = messagequeue(configuration)?;
        let auth = authserver(configuration, &ipia.service, &queue.service)?;

        let webapp = webappserver(configuration)?;

        // phase one of the cycle break: pre-declared contracts
        let logging_contract = ServiceHandle::internal("loggingservice");
        let personaldata_contract = ServiceHandle::internal("personaldataservice");

        let user = userservice(
            configuration,
            &UserServiceDeps {
                messagequeue: &queue.service,
                qpiaservice: &qpia.service,
                authserver: &auth.service,
                loggingservice: &logging_contract,
                personaldataservice: &personaldata_contract,
            },
        )?;

        let logging = loggingservice(
            configuration,
            &LoggingServiceDeps {
                qpiaservice: &qpia.service,
                authserver: &auth.service,
                userservice: &user.internal_service,
            },
        )?;
        let personaldata = personaldataservice(
            configuration,
            &PersonaldataServiceDeps {
                ipiaservice: &ipia.service,
                messagequeue: &queue.service,
                authserver: &auth.service,
                loggingservice: &logging.internal_service,
                userservice: &user.internal_service,
            },
        )?;

        // phase two: the real handles must equal the pre-declared contracts
        ensure!(
            logging_contract == logging.internal_service,
            "loggingservice contract {:?} does not match the constructed handle {:?}",
            logging_contract,
            logging.internal_service
        );
        ensure!(
            personaldata_contract == personaldata.internal_service,
            "personaldataservice contract {:?} does not match the constructed handle {:?}",
            personaldata_contract,
            personaldata.internal_service
        );
        debug!("cyclic service contracts verified");

        let modys = modysservice(
            configuration,
            &user.internal_service,
            &personaldata.internal_service,
        )?;

        let compliance = complianceservice(
            configuration,
            &ComplianceServiceDeps {
                userservice: &user.internal_service,
                ewpiaservice: &ewpia.service,
                messagequeue: &queue.service,
                authserver: &auth.service,
            },
        )?;

        let sampletracking = sampletrackingservice(
            configuration,
            &SampleTrackingServiceDeps {
                userservice: &user.internal_service,
                qpiaservice: &qpia.service,
                complianceservice: &compliance.internal_service,
                messagequeue: &queue.service,
                authserver: &auth.service,
            },
        )?;

        let publicapi = publicapiserver(configuration, &auth.service)?;

        let eventhistory =
            eventhistoryserver(configuration, &auth.service, &qpia.service, &queue.service)?;

        let questionnaire = questionnaireservice(
            configuration,
            &QuestionnaireServiceDeps {
                userservice: &user.internal_service,
                qpiaservice: &qpia.service,
                complianceservice: &compliance.internal_service,
                sampletrackingservice: &sampletracking.internal_service,
                loggingservice: &logging.internal_service,
                messagequeue: &queue.service,
                authserver: &auth.service,
            },
        )?;

        let analyzer = analyzerservice(configuration, &qpia.service, &queue.service)?;

        let notification = notificationservice(
            configuration,
            &NotificationServiceDeps {
                userservice: &user.internal_service,
                qpiaservice: &qpia.service,
                messagequeue: &queue.service,
                authserver: &auth.service,
                personaldataservice: &personaldata.internal_service,
                questionnaireservice: &questionnaire.internal_service,
            },
        )?;

        let feedbackstatistic = feedbackstatisticservice(
            configuration,
            &FeedbackStatisticServiceDeps {
                userservice: &user.internal_service,
                qpiaservice: &qpia.service,
                messagequeue: &queue.service,
                authserver: &auth.service,
                questionnaireservice: &questionnaire.internal_service,
            },
        )?;

        let sormas = sormasservice(
            configuration,
            &SormasServiceDeps {
                userservice: &user.internal_service,
                qpiaservice: &qpia.service,
                messagequeue: &queue.service,
                authserver: &auth.service,
                personaldataservice: &personaldata.internal_service,
                questionnaireservice: &questionnaire.internal_service,
            },
        )?;

        let gateway = apigateway(
            configuration,
            &ApiGatewayDeps {
                webappserver: &webapp.service,
                authserver: &auth.service,
                userservice: &user.service,
                loggingservice: &logging.service,
                personaldataservice: &personaldata.service,
                modysservice: &modys.service,
                complianceservice: &compliance.service,
                questionnaireservice: &questionnaire.service,
                analyzerservice: &analyzer.service,
                notificationservice: &notification.service,
                sampletrackingservice: &sampletracking.service,
                feedbackstatisticservice: &feedbackstatistic.service,
                sormasservice: &sormas.service,
                publicapiserver: &publicapi.service,
                eventhistoryserver: &eventhistory.service,
            },
        )?;

        let eventproxy = autheventproxy(configuration, &queue.service, &auth.service)?;

        let mail = mailserver(configuration)?;

        let scheduler = jobscheduler(
            configuration,
            &user.internal_service,
            &questionnaire.internal_service,
        )?;

        Ok(Self {
            charts: vec![
                namespace,
                qpia.chart,
                ewpia.chart,
                ipia.chart,
                queue.chart,
                auth.chart,
                webapp.chart,
                user.chart,
                logging.chart,
                personaldata.chart,
                modys.chart,
                compliance.chart,
                questionnaire.chart,
                analyzer.chart,
                notification.chart,
                sampletracking.chart,
                feedbackstatistic.chart,
                sormas.chart,
                publicapi.chart,
                eventhistory.chart,
                gateway.chart,
                eventproxy.chart,
                mail.chart,
                scheduler,
            ],
        })
    }

    /// The ordered list of root charts
    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_builds_every_chart() {
        let configuration = Configuration::new().unwrap();
        let assembly = Assembly::build(&configuration).unwrap();
        assert_eq!(assembly.charts().len(), 24);
        assert_eq!(assembly.charts()[0].name(), "namespace");
    }

    #[test]
    fn test_cyclic_contracts_match_the_real_handles() {
        let configuration = Configuration::new().unwrap();
        // the equality checks inside build() abort on mismatch, so a
        // successful build is the property under test
        assert!(Assembly::build(&configuration).is_ok());
    }
}
