//! In-memory correction store, used by tests and by callers that build
//! artifacts programmatically.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::artifact::ArtifactFile;
use crate::errors::{ErrorInfo, TauIdError};
use crate::objects::NumericObject;
use crate::store::{digest_json, missing_object, Artifact, CorrectionStore};

/// Store holding artifacts in a map keyed by identity.
///
/// Tracks how many handles are currently open and how many opens were
/// attempted, so callers can verify scoped release.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: BTreeMap<String, ArtifactFile>,
    open_handles: Arc<AtomicUsize>,
    open_calls: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an artifact.
    pub fn insert(&mut self, identity: impl Into<String>, artifact: ArtifactFile) {
        self.artifacts.insert(identity.into(), artifact);
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_artifact(mut self, identity: impl Into<String>, artifact: ArtifactFile) -> Self {
        self.insert(identity, artifact);
        self
    }

    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Number of `open` calls, successful or not.
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Stored identities.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }
}

impl CorrectionStore for MemoryStore {
    type Artifact = MemoryArtifact;

    fn open(&self, identity: &str) -> Result<MemoryArtifact, TauIdError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        let file = self.artifacts.get(identity).ok_or_else(|| {
            TauIdError::NotFound(
                ErrorInfo::new("tauid.store.not_found", "artifact does not exist")
                    .with_context("artifact", identity),
            )
        })?;
        file.check_schema(identity)?;
        let digest = digest_json(file)?;
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryArtifact {
            identity: identity.to_string(),
            digest,
            objects: file.objects.clone(),
            open_handles: Some(Arc::clone(&self.open_handles)),
        })
    }
}

/// Open in-memory artifact.
#[derive(Debug)]
pub struct MemoryArtifact {
    identity: String,
    digest: String,
    objects: BTreeMap<String, NumericObject>,
    open_handles: Option<Arc<AtomicUsize>>,
}

impl Artifact for MemoryArtifact {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn digest(&self) -> &str {
        &self.digest
    }

    fn object(&self, name: &str) -> Result<NumericObject, TauIdError> {
        self.objects
            .get(name)
            .cloned()
            .ok_or_else(|| missing_object(&self.identity, name))
    }

    fn close(&mut self) {
        if let Some(counter) = self.open_handles.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MemoryArtifact {
    fn drop(&mut self) {
        self.close();
    }
}
