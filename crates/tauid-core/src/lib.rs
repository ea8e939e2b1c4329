#![deny(missing_docs)]
#![doc = "Core types for tau identification corrections: classification keys, uncertainty requests, numeric objects and the correction store contract."]

pub mod artifact;
pub mod config;
pub mod errors;
pub mod json_store;
pub mod keys;
pub mod memory_store;
pub mod objects;
pub mod store;
pub mod uncertainty;

pub use artifact::{
    ArtifactFile, ArtifactProvenance, ArtifactRecord, SchemaVersion, ARTIFACT_SCHEMA,
};
pub use config::StoreConfig;
pub use errors::{ErrorInfo, ErrorKind, TauIdError};
pub use json_store::{JsonArtifact, JsonStore};
pub use keys::{Algorithm, Discriminates, Era, GenMatch, WorkingPoint};
pub use memory_store::{MemoryArtifact, MemoryStore};
pub use objects::{
    Bin, BinnedCorrection, Curve, GraphCorrection, GraphPoint, NumericObject, Segment,
};
pub use store::{with_artifact, Artifact, CorrectionStore};
pub use uncertainty::{Direction, Estimate, Triple, Uncertainty};
