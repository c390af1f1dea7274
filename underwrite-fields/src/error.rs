//! Error types for the dictionary registries

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dictionary operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while loading or querying the dictionary
#[derive(Debug, Error)]
pub enum FieldsError {
    /// No exact or template definition matches a data key
    #[error("field not found: {key}")]
    FieldNotFound { key: String },

    /// Two field definitions share a key
    #[error("duplicate field key: {key}")]
    DuplicateFieldKey { key: String },

    /// Two group definitions share an id
    #[error("duplicate group id: {id}")]
    DuplicateGroupId { id: String },

    /// Two template keys normalize to the same signature and would match the same data keys
    #[error("ambiguous template '{key}': overlaps with '{existing}' (signature {signature})")]
    AmbiguousTemplate {
        key: String,
        existing: String,
        signature: String,
    },

    /// A template key could not be compiled into a matcher
    #[error("invalid template key '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// A template group is malformed
    #[error("invalid template group '{id}': {message}")]
    InvalidTemplateGroup { id: String, message: String },

    /// Parent links between groups form a cycle
    #[error("group hierarchy cycle through '{id}'")]
    GroupCycle { id: String },

    /// Dictionary directory not found
    #[error("dictionary directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error in a dictionary file
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// A `state_specific_options` map without the mandatory `default` list.
///
/// Raised while a definition is deserialized, so a registry can never hold
/// an option map that has nothing to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("state-specific options must include a `default` list")]
pub struct MissingDefault;

impl FieldsError {
    /// True for the lookup miss callers are expected to recover from locally.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FieldsError::FieldNotFound { .. })
    }
}
