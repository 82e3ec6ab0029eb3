//! Error types for Tagdex.

use thiserror::Error;

/// Top-level result type for Tagdex operations.
pub type Result<T> = std::result::Result<T, TagdexError>;

/// Top-level error type for Tagdex.
#[derive(Debug, Error)]
pub enum TagdexError {
    #[error("configuration error: {0}")]
    Config(#[from] PathError),

    #[error("a file at '{path}' blocks creation of a parent folder")]
    PathConflict { path: String },

    #[error("target path '{path}' is a folder, not a file")]
    NotAFile { path: String },

    #[error("tag index update already in progress")]
    UpdateInProgress,

    #[error("vault error: {0}")]
    Vault(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failures from target path resolution.
///
/// These are returned as values and checked by the caller; the resolver
/// itself never panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("target file path is empty")]
    Empty,

    #[error("target file path is invalid: {0}")]
    Invalid(String),

    #[error("target file path must end with .md (or omit the extension to auto-append it)")]
    Extension,
}
