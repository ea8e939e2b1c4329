//! Explicit store configuration.
//!
//! The core never consults the environment; applications resolve the data
//! directory once and pass a [`StoreConfig`] in.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TauIdError};

fn default_extension() -> String {
    "json".to_string()
}

/// Location and naming of artifacts on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the artifacts.
    pub data_dir: PathBuf,
    /// File extension appended to artifact identities.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl StoreConfig {
    /// Configuration for `data_dir` with the default extension.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: default_extension(),
        }
    }

    /// Path of the file backing `identity`.
    pub fn artifact_path(&self, identity: &str) -> PathBuf {
        self.data_dir.join(format!("{identity}.{}", self.extension))
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TauIdError> {
        toml::from_str(contents).map_err(|err| {
            TauIdError::InvalidConfiguration(ErrorInfo::new(
                "tauid.config.parse",
                err.to_string(),
            ))
        })
    }

    /// Reads and parses a TOML file. Relative data directories are taken
    /// relative to the file's own directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, TauIdError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            TauIdError::InvalidConfiguration(
                ErrorInfo::new(
                    "tauid.config.read",
                    format!("failed to read store config: {err}"),
                )
                .with_context("path", path.display().to_string()),
            )
        })?;
        let mut config = Self::from_toml_str(&contents)
            .map_err(|err| err.with_context("path", path.display().to_string()))?;
        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }
}
