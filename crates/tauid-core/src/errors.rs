//! Structured error types shared across tauid crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TauIdError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (artifact identity, object name, era, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Fieldless discriminant of [`TauIdError`], convenient for matching in tests
/// and callers that only care about the failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unrecognised or mutually exclusive configuration.
    InvalidConfiguration,
    /// Artifact identity does not resolve to an existing artifact.
    NotFound,
    /// Named object is absent from an artifact.
    MissingObject,
    /// Artifact or object exists but cannot be interpreted.
    Corrupt,
    /// Evaluation axis is not defined by the resolved scheme.
    UnsupportedOperation,
}

/// Canonical error type for tau ID corrections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TauIdError {
    /// Unrecognised era/algorithm/working point or conflicting options.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ErrorInfo),
    /// Correction store could not resolve an artifact identity.
    #[error("artifact not found: {0}")]
    NotFound(ErrorInfo),
    /// Requested object name is absent from the artifact.
    #[error("missing object: {0}")]
    MissingObject(ErrorInfo),
    /// Artifact or object could not be parsed or has the wrong shape.
    #[error("corrupt artifact: {0}")]
    Corrupt(ErrorInfo),
    /// Evaluation method called on an axis the resolved scheme does not define.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(ErrorInfo),
}

impl TauIdError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TauIdError::InvalidConfiguration(info)
            | TauIdError::NotFound(info)
            | TauIdError::MissingObject(info)
            | TauIdError::Corrupt(info)
            | TauIdError::UnsupportedOperation(info) => info,
        }
    }

    /// Returns the failure family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TauIdError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            TauIdError::NotFound(_) => ErrorKind::NotFound,
            TauIdError::MissingObject(_) => ErrorKind::MissingObject,
            TauIdError::Corrupt(_) => ErrorKind::Corrupt,
            TauIdError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }

    /// Shorthand for an [`TauIdError::InvalidConfiguration`] error.
    pub fn invalid(code: &str, message: impl Into<String>) -> Self {
        TauIdError::InvalidConfiguration(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`TauIdError::Corrupt`] error.
    pub fn corrupt(code: &str, message: impl Into<String>) -> Self {
        TauIdError::Corrupt(ErrorInfo::new(code, message))
    }

    /// Shorthand for an [`TauIdError::UnsupportedOperation`] error.
    pub fn unsupported(code: &str, message: impl Into<String>) -> Self {
        TauIdError::UnsupportedOperation(ErrorInfo::new(code, message))
    }

    /// Returns the error with an extra context entry attached to its payload.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            TauIdError::InvalidConfiguration(info) => {
                TauIdError::InvalidConfiguration(info.with_context(key, value))
            }
            TauIdError::NotFound(info) => TauIdError::NotFound(info.with_context(key, value)),
            TauIdError::MissingObject(info) => {
                TauIdError::MissingObject(info.with_context(key, value))
            }
            TauIdError::Corrupt(info) => TauIdError::Corrupt(info.with_context(key, value)),
            TauIdError::UnsupportedOperation(info) => {
                TauIdError::UnsupportedOperation(info.with_context(key, value))
            }
        }
    }
}
