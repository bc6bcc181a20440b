//! Deployment precheck.
//!
//! Compares the files present in the secret source directories against the
//! key lists the generated manifests reference. A missing file would only
//! surface as a crash-looping pod after deployment, so the check runs before
//! anything is applied.

use crate::config::{CONFIG_KEYS, INTERNAL_SECRET_KEYS};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Keys expected by the manifests but absent from the source directories
#[derive(Debug, Default)]
pub struct PrecheckReport {
    pub missing_internal_secrets: Vec<String>,
    pub missing_config_keys: Vec<String>,
}

impl PrecheckReport {
    pub fn passed(&self) -> bool {
        self.missing_internal_secrets.is_empty() && self.missing_config_keys.is_empty()
    }
}

fn file_names(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_type().is_file() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    debug!(dir = %dir.display(), files = names.len(), "scanned secret source directory");
    Ok(names)
}

fn missing(expected: &[&str], present: &BTreeSet<String>) -> Vec<String> {
    expected
        .iter()
        .filter(|key| !present.contains(**key))
        .map(|key| (*key).to_string())
        .collect()
}

/// Check both secret source directories against the expected key lists
///
/// An unreadable directory is an error; missing individual files are
/// reported, not fatal.
pub fn precheck(internal_secrets_dir: &Path, config_dir: &Path) -> Result<PrecheckReport> {
    let internal = file_names(internal_secrets_dir)?;
    let config = file_names(config_dir)?;
    Ok(PrecheckReport {
        missing_internal_secrets: missing(&INTERNAL_SECRET_KEYS, &internal),
        missing_config_keys: missing(&CONFIG_KEYS, &config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_empty_directories_report_every_key() {
        let internal = tempfile::tempdir().unwrap();
        let config = tempfile::tempdir().unwrap();
        let report = precheck(internal.path(), config.path()).unwrap();
        assert!(!report.passed());
        assert_eq!(report.missing_internal_secrets.len(), INTERNAL_SECRET_KEYS.len());
        assert_eq!(report.missing_config_keys.len(), CONFIG_KEYS.len());
    }

    #[test]
    fn test_complete_directories_pass() {
        let internal = tempfile::tempdir().unwrap();
        let config = tempfile::tempdir().unwrap();
        for key in INTERNAL_SECRET_KEYS {
            fs::write(internal.path().join(key), "x").unwrap();
        }
        for key in CONFIG_KEYS {
            fs::write(config.path().join(key), "x").unwrap();
        }
        let report = precheck(internal.path(), config.path()).unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_one_missing_file_is_named() {
        let internal = tempfile::tempdir().unwrap();
        let config = tempfile::tempdir().unwrap();
        for key in INTERNAL_SECRET_KEYS.iter().skip(1) {
            fs::write(internal.path().join(key), "x").unwrap();
        }
        for key in CONFIG_KEYS {
            fs::write(config.path().join(key), "x").unwrap();
        }
        let report = precheck(internal.path(), config.path()).unwrap();
        assert_eq!(report.missing_internal_secrets, vec![INTERNAL_SECRET_KEYS[0].to_string()]);
        assert!(report.missing_config_keys.is_empty());
    }

    #[test]
    fn test_unreadable_directory_is_fatal() {
        let config = tempfile::tempdir().unwrap();
        assert!(precheck(Path::new("/nonexistent-secrets"), config.path()).is_err());
    }
}
