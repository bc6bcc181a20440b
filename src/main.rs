//! Command-line entry point.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pia_k8s::{assembly::Assembly, config::Configuration, emit, precheck, secrets};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// PIA Kubernetes manifest generator
#[derive(Parser)]
#[command(name = "pia-k8s")]
#[command(about = "Generates the Kubernetes objects of a PIA deployment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every Kubernetes object of the deployment as YAML on stdout
    GenerateK8sObjects,
    /// Print a freshly generated internal credentials Secret as YAML on stdout
    GenerateInternalSecrets,
    /// Verify that the secret source directories hold every expected file
    Precheck {
        /// Directory holding one file per internal secret key
        #[arg(value_name = "INTERNAL_SECRETS_PATH")]
        internal_secrets_dir: PathBuf,
        /// Directory holding one file per configuration key
        #[arg(value_name = "PIA_CONFIG_PATH")]
        config_dir: PathBuf,
    },
}

fn generate_k8s_objects() -> Result<()> {
    let configuration = Configuration::new()?;
    info!(version = %configuration.pia_version, "generating deployment objects");
    let assembly = Assembly::build(&configuration)?;
    let stdout = std::io::stdout();
    emit::emit_charts(assembly.charts(), &mut stdout.lock())
}

fn generate_internal_secrets() -> Result<()> {
    let configuration = Configuration::new()?;
    let chart = secrets::internal_secrets(&configuration)?;
    let stdout = std::io::stdout();
    emit::emit_charts(&[chart], &mut stdout.lock())
}

fn run_precheck(internal_secrets_dir: &PathBuf, config_dir: &PathBuf) -> Result<bool> {
    let report = precheck::precheck(internal_secrets_dir, config_dir)?;
    if report.passed() {
        println!("precheck passed");
        return Ok(true);
    }
    let stderr = std::io::stderr();
    let mut stderr = stderr.lock();
    for key in &report.missing_internal_secrets {
        writeln!(stderr, "missing internal secret: {key}")
            .context("failed to write to stderr")?;
    }
    for key in &report.missing_config_keys {
        writeln!(stderr, "missing config key: {key}").context("failed to write to stderr")?;
    }
    Ok(false)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pia_k8s=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::GenerateK8sObjects => generate_k8s_objects().map(|()| true),
        Commands::GenerateInternalSecrets => generate_internal_secrets().map(|()| true),
        Commands::Precheck {
            internal_secrets_dir,
            config_dir,
        } => run_precheck(internal_secrets_dir, config_dir),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_precheck_takes_both_paths_positionally() {
        let cli = Cli::try_parse_from(["pia-k8s", "precheck", "/secrets", "/config"]).unwrap();
        match cli.command {
            Commands::Precheck {
                internal_secrets_dir,
                config_dir,
            } => {
                assert_eq!(internal_secrets_dir, Path::new("/secrets"));
                assert_eq!(config_dir, Path::new("/config"));
            }
            _ => panic!("expected the precheck subcommand"),
        }
    }

    #[test]
    fn test_precheck_requires_both_paths() {
        assert!(Cli::try_parse_from(["pia-k8s", "precheck", "/secrets"]).is_err());
    }
}
