//! Error kinds surfaced by the generation core
//!
//! Nothing here is retried. A failed regeneration leaves the previously
//! generated artifact and the live accessor untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for the library
pub type Result<T> = std::result::Result<T, KeysError>;

/// Errors produced while loading, generating or persisting configuration
#[derive(Error, Debug)]
pub enum KeysError {
    /// The source document is not valid JSON
    #[error("failed to parse {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document cannot be turned into a schema tree
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// File creation, read or write failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural violations; each names the offending key path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("expected a JSON object at `{path}`, found {found}")]
    NotAnObject { path: String, found: &'static str },

    #[error("could not assign a unique type name to `{path}` (last tried `{name}`)")]
    NameCollision { path: String, name: String },
}

impl KeysError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeysError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error came from unparseable source bytes
    pub fn is_load(&self) -> bool {
        matches!(self, KeysError::Load { .. })
    }

    /// True when the error is a structural violation
    pub fn is_structural(&self) -> bool {
        matches!(self, KeysError::Structural(_))
    }
}

/// Human readable JSON type name, used in structural errors
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
