//! Correction store backed by a directory of JSON artifacts.

use std::collections::BTreeMap;
use std::fs;

use crate::artifact::ArtifactFile;
use crate::config::StoreConfig;
use crate::errors::{ErrorInfo, TauIdError};
use crate::objects::NumericObject;
use crate::store::{digest_bytes, missing_object, Artifact, CorrectionStore};

/// Reads `<data_dir>/<identity>.<extension>` documents.
#[derive(Debug, Clone)]
pub struct JsonStore {
    config: StoreConfig,
}

impl JsonStore {
    /// Creates a store over the configured directory.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl CorrectionStore for JsonStore {
    type Artifact = JsonArtifact;

    fn open(&self, identity: &str) -> Result<JsonArtifact, TauIdError> {
        let path = self.config.artifact_path(identity);
        if !path.is_file() {
            return Err(TauIdError::NotFound(
                ErrorInfo::new("tauid.store.not_found", "artifact does not exist")
                    .with_context("artifact", identity)
                    .with_context("path", path.display().to_string()),
            ));
        }
        let bytes = fs::read(&path).map_err(|err| {
            TauIdError::Corrupt(
                ErrorInfo::new("tauid.store.read", "failed to read artifact")
                    .with_context("artifact", identity)
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let file: ArtifactFile = serde_json::from_slice(&bytes).map_err(|err| {
            TauIdError::Corrupt(
                ErrorInfo::new("tauid.store.parse", "failed to parse artifact")
                    .with_context("artifact", identity)
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        file.check_schema(identity)?;
        Ok(JsonArtifact {
            identity: identity.to_string(),
            digest: digest_bytes(&bytes),
            objects: Some(file.objects),
        })
    }
}

/// Open JSON artifact. The parsed objects are dropped on [`Artifact::close`].
#[derive(Debug)]
pub struct JsonArtifact {
    identity: String,
    digest: String,
    objects: Option<BTreeMap<String, NumericObject>>,
}

impl Artifact for JsonArtifact {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn digest(&self) -> &str {
        &self.digest
    }

    fn object(&self, name: &str) -> Result<NumericObject, TauIdError> {
        let objects = self.objects.as_ref().ok_or_else(|| {
            TauIdError::Corrupt(
                ErrorInfo::new("tauid.store.closed", "artifact handle already closed")
                    .with_context("artifact", self.identity.as_str()),
            )
        })?;
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| missing_object(&self.identity, name))
    }

    fn close(&mut self) {
        self.objects = None;
    }
}
