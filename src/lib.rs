//! # PIA Kubernetes Manifest Generator
//!
//! Generates the complete set of Kubernetes objects for a PIA deployment
//! as one multi-document YAML stream on stdout.
//!
//! ## Overview
//!
//! The generator is a plain program, not a controller: it never talks to a
//! cluster. It works in three layers:
//!
//! 1. **Configuration** - deployment-wide settings and the environment
//!    variable catalog every service draws from, with checked references
//!    into the two deployment Secrets
//! 2. **Charts** - one module per microservice, built through shared
//!    StatefulSet/Deployment builders, wired together via the `(name, port)`
//!    handles of their upstream Services
//! 3. **Assembly and emission** - constructs every chart in dependency
//!    order, verifies the two legitimate dependency cycles against
//!    pre-declared contracts, and serializes everything in insertion order
//!
//! Besides manifest generation the binary can mint the internal credential
//! Secret (`generate-internal-secrets`) and verify the secret source
//! directories of a deployment before it is applied (`precheck`).

pub mod assembly;
pub mod builders;
pub mod charts;
pub mod config;
pub mod constants;
pub mod emit;
pub mod k8s;
pub mod precheck;
pub mod secrets;

pub use assembly::Assembly;
pub use config::Configuration;
