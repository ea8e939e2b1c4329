//! Schema and provenance descriptors of persisted calibration artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TauIdError};
use crate::objects::NumericObject;

/// Semantic version describing the schema of serialized artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        ARTIFACT_SCHEMA
    }
}

/// Schema version written by this crate; readers accept any minor/patch of it.
pub const ARTIFACT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Where a calibration artifact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArtifactProvenance {
    /// Measurement or script that produced the numbers.
    #[serde(default)]
    pub source: String,
    /// ISO-8601 timestamp of production.
    #[serde(default)]
    pub created_at: String,
    /// Free-form notes (references to presentations, caveats).
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
}

/// On-disk layout of one calibration artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Schema version of the document.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Production metadata.
    #[serde(default)]
    pub provenance: ArtifactProvenance,
    /// Named numeric objects.
    pub objects: BTreeMap<String, NumericObject>,
}

impl ArtifactFile {
    /// An empty artifact at the current schema version.
    pub fn new() -> Self {
        Self {
            schema_version: ARTIFACT_SCHEMA,
            provenance: ArtifactProvenance::default(),
            objects: BTreeMap::new(),
        }
    }

    /// Adds a named object, replacing any previous one with that name.
    pub fn with_object(mut self, name: impl Into<String>, object: NumericObject) -> Self {
        self.objects.insert(name.into(), object);
        self
    }

    /// Rejects documents written with an incompatible major schema version.
    pub fn check_schema(&self, identity: &str) -> Result<(), TauIdError> {
        if self.schema_version.major != ARTIFACT_SCHEMA.major {
            return Err(TauIdError::Corrupt(
                ErrorInfo::new(
                    "tauid.artifact.schema",
                    format!(
                        "artifact schema {}.{}.{} is incompatible with reader schema {}.x",
                        self.schema_version.major,
                        self.schema_version.minor,
                        self.schema_version.patch,
                        ARTIFACT_SCHEMA.major
                    ),
                )
                .with_context("artifact", identity),
            ));
        }
        Ok(())
    }
}

impl Default for ArtifactFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity and content digest of an artifact read during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact identity as requested from the store.
    pub identity: String,
    /// Hex SHA-256 digest of the artifact contents.
    pub digest: String,
}
