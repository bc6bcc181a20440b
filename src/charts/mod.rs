//! # Service Charts
//!
//! One module per microservice. Each chart constructor receives the
//! [`Configuration`](crate::config::Configuration) and the handles of its
//! already-constructed upstream charts, and declares the environment-variable
//! map its container image expects.
//!
//! Charts whose collaborators' Service names are hardcoded inside downstream
//! images verify those names at construction time; a mismatch aborts the
//! whole generation before any output is produced.

mod analyzerservice;
mod apigateway;
mod authserver;
mod autheventproxy;
mod complianceservice;
mod databases;
mod eventhistoryserver;
mod feedbackstatisticservice;
mod jobscheduler;
mod loggingservice;
mod mailserver;
mod messagequeue;
mod modysservice;
mod namespace;
mod notificationservice;
mod personaldataservice;
mod publicapiserver;
mod questionnaireservice;
mod sampletrackingservice;
mod sormasservice;
mod userservice;
mod webappserver;

pub use analyzerservice::analyzerservice;
pub use apigateway::{apigateway, ApiGateway, ApiGatewayDeps};
pub use authserver::{authserver, Authserver};
pub use autheventproxy::autheventproxy;
pub use complianceservice::{complianceservice, ComplianceServiceDeps};
pub use databases::{ewpiaservice, ipiaservice, qpiaservice};
pub use eventhistoryserver::eventhistoryserver;
pub use feedbackstatisticservice::{feedbackstatisticservice, FeedbackStatisticServiceDeps};
pub use jobscheduler::jobscheduler;
pub use loggingservice::{loggingservice, LoggingServiceDeps};
pub use mailserver::{mailserver, MailServer};
pub use messagequeue::{messagequeue, MessageQueue};
pub use modysservice::modysservice;
pub use namespace::namespace;
pub use notificationservice::{notificationservice, NotificationServiceDeps};
pub use personaldataservice::{personaldataservice, PersonaldataServiceDeps};
pub use publicapiserver::publicapiserver;
pub use questionnaireservice::{questionnaireservice, QuestionnaireServiceDeps};
pub use sampletrackingservice::{sampletrackingservice, SampleTrackingServiceDeps};
pub use sormasservice::{sormasservice, SormasServiceDeps};
pub use userservice::{userservice, UserServiceDeps};
pub use webappserver::webappserver;
