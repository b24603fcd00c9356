//! Error types for pf-core

use thiserror::Error;

/// Core error type for Pennyflow
///
/// Every variant here is fatal: the pipeline stops before attribution and
/// returns no partial result. Recoverable input anomalies are modelled as
/// [`Warning`](crate::warning::Warning)s instead.
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Circular dependency detected in the model graph
    #[error("[E001] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E002: Duplicate model name in the manifest
    #[error("[E002] Duplicate model name: {name}")]
    DuplicateModel { name: String },

    /// E003: Empty name where a non-empty one is required
    #[error("[E003] Empty name: {context}")]
    EmptyName { context: String },

    /// E004: Malformed manifest document
    #[error("[E004] Failed to parse manifest: {message}")]
    ManifestParse { message: String },

    /// E005: IO error with file path context
    #[error("[E005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E006: Malformed analysis configuration
    #[error("[E006] Failed to parse config: {message}")]
    ConfigParse { message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
