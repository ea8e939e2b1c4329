//! The correction store contract.
//!
//! A store resolves an artifact identity to an open [`Artifact`], from which
//! named [`NumericObject`]s are extracted as owned values. Engines never keep
//! an artifact open: [`with_artifact`] opens, extracts and releases in one
//! scope, on the success and the failure path alike.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::artifact::ArtifactRecord;
use crate::errors::{ErrorInfo, TauIdError};
use crate::objects::{BinnedCorrection, Curve, GraphCorrection, NumericObject};

/// An open calibration artifact.
pub trait Artifact {
    /// Identity the artifact was opened with.
    fn identity(&self) -> &str;

    /// Hex SHA-256 digest of the artifact contents.
    fn digest(&self) -> &str;

    /// Extracts a named object, detached from the handle.
    fn object(&self, name: &str) -> Result<NumericObject, TauIdError>;

    /// Releases the handle. Calling it more than once has no further effect.
    fn close(&mut self);

    /// Extracts a binned step function.
    fn binned(&self, name: &str) -> Result<BinnedCorrection, TauIdError> {
        match self.object(name)? {
            NumericObject::Binned(table) => Ok(table),
            other => Err(wrong_kind(self.identity(), name, "binned", other.kind())),
        }
    }

    /// Extracts a piecewise curve.
    fn curve(&self, name: &str) -> Result<Curve, TauIdError> {
        match self.object(name)? {
            NumericObject::Curve(curve) => Ok(curve),
            other => Err(wrong_kind(self.identity(), name, "curve", other.kind())),
        }
    }

    /// Extracts a point set with asymmetric errors.
    fn graph(&self, name: &str) -> Result<GraphCorrection, TauIdError> {
        match self.object(name)? {
            NumericObject::Graph(graph) => Ok(graph),
            other => Err(wrong_kind(self.identity(), name, "graph", other.kind())),
        }
    }
}

/// Read-only provider of calibration artifacts.
pub trait CorrectionStore {
    /// Handle type returned by [`CorrectionStore::open`].
    type Artifact: Artifact;

    /// Opens an artifact by identity.
    ///
    /// Fails with [`TauIdError::NotFound`] when the identity does not resolve
    /// and with [`TauIdError::Corrupt`] when it resolves but cannot be parsed.
    fn open(&self, identity: &str) -> Result<Self::Artifact, TauIdError>;
}

/// Opens `identity`, runs `extract` against it and releases the handle.
///
/// Returns the extracted value together with the artifact's identity and
/// digest. The handle is closed whether `extract` succeeds or fails.
pub fn with_artifact<S, T, F>(
    store: &S,
    identity: &str,
    extract: F,
) -> Result<(T, ArtifactRecord), TauIdError>
where
    S: CorrectionStore + ?Sized,
    F: FnOnce(&S::Artifact) -> Result<T, TauIdError>,
{
    let mut artifact = store.open(identity)?;
    debug!(artifact = identity, digest = artifact.digest(), "opened artifact");
    let record = ArtifactRecord {
        identity: artifact.identity().to_string(),
        digest: artifact.digest().to_string(),
    };
    let extracted = extract(&artifact);
    artifact.close();
    debug!(artifact = identity, ok = extracted.is_ok(), "released artifact");
    extracted.map(|value| (value, record))
}

/// Error for an object name that is absent from an artifact.
pub fn missing_object(identity: &str, name: &str) -> TauIdError {
    TauIdError::MissingObject(
        ErrorInfo::new(
            "tauid.store.missing_object",
            format!("object '{name}' not found in artifact"),
        )
        .with_context("artifact", identity)
        .with_context("object", name),
    )
}

fn wrong_kind(identity: &str, name: &str, expected: &str, found: &str) -> TauIdError {
    TauIdError::Corrupt(
        ErrorInfo::new(
            "tauid.store.object_kind",
            format!("object '{name}' is a {found}, expected a {expected}"),
        )
        .with_context("artifact", identity)
        .with_context("object", name),
    )
}

/// Hex SHA-256 digest of raw bytes.
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex SHA-256 digest of the canonical JSON encoding of a value.
pub fn digest_json<T: Serialize>(value: &T) -> Result<String, TauIdError> {
    let bytes = serde_json::to_vec(value).map_err(|err| {
        TauIdError::Corrupt(ErrorInfo::new("tauid.store.encode", err.to_string()))
    })?;
    Ok(digest_bytes(&bytes))
}
