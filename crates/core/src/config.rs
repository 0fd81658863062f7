//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::DEFAULT_DATABASE_PATH;
use crate::{ClassificationError, ClassificationResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    reference_data: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `reference_data`, when given, must point at an existing file; it is imported into the
    /// database at startup.
    pub fn new(database_path: PathBuf, reference_data: Option<PathBuf>) -> ClassificationResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(ClassificationError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        if let Some(path) = &reference_data {
            if !path.is_file() {
                return Err(ClassificationError::InvalidInput(format!(
                    "reference data file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            database_path,
            reference_data,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn reference_data(&self) -> Option<&Path> {
        self.reference_data.as_deref()
    }
}

/// Resolve the database path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default database file.
pub fn database_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

/// Resolve the optional reference data file from an optional string value.
pub fn reference_data_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn blank_database_path_falls_back_to_default() {
        assert_eq!(
            database_path_from_env_value(Some("  ".into())),
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        assert_eq!(
            database_path_from_env_value(Some("/var/lib/ppr.db".into())),
            PathBuf::from("/var/lib/ppr.db")
        );
    }

    #[test]
    fn missing_reference_data_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("reference.yaml");

        let err = CoreConfig::new(temp_dir.path().join("ppr.db"), Some(missing))
            .expect_err("expected missing file to be rejected");
        assert!(matches!(err, ClassificationError::InvalidInput(_)));
    }

    #[test]
    fn reference_data_env_value_ignores_blank() {
        assert_eq!(reference_data_from_env_value(Some("".into())), None);
        assert_eq!(reference_data_from_env_value(None), None);
    }
}
